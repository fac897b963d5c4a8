use glam::Vec3;

use crate::raycast::Aabb;

/// Segment `start..end` swept by `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

impl Capsule {
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self {
            start,
            end,
            radius: radius.max(0.0),
        }
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.start += offset;
        self.end += offset;
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.start.lerp(self.end, t)
    }
}

/// Penetration of a capsule into static geometry. `normal` points out of the geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub normal: Vec3,
    pub depth: f32,
}

/// Static axis-aligned boxes the player collides with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionWorld {
    boxes: Vec<Aabb>,
}

impl CollisionWorld {
    pub fn new(boxes: Vec<Aabb>) -> Self {
        Self { boxes }
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn boxes(&self) -> &[Aabb] {
        &self.boxes
    }

    /// Deepest contact between `capsule` and any box, if it penetrates one.
    pub fn capsule_intersect(&self, capsule: &Capsule) -> Option<Contact> {
        self.boxes
            .iter()
            .filter_map(|b| capsule_vs_box(capsule, b))
            .max_by(|a, b| a.depth.total_cmp(&b.depth))
    }
}

fn capsule_vs_box(capsule: &Capsule, aabb: &Aabb) -> Option<Contact> {
    if !aabb
        .expanded(capsule.radius)
        .intersects(&Aabb::new(capsule.start, capsule.end))
    {
        return None;
    }

    // Distance from the segment to a convex box is convex in t.
    let dist = |t: f32| {
        let p = capsule.point_at(t);
        (p - aabb.closest_point(p)).length()
    };
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    for _ in 0..40 {
        let m1 = lo + (hi - lo) / 3.0;
        let m2 = hi - (hi - lo) / 3.0;
        if dist(m1) <= dist(m2) {
            hi = m2;
        } else {
            lo = m1;
        }
    }
    let p = capsule.point_at((lo + hi) * 0.5);
    let closest = aabb.closest_point(p);
    let offset = p - closest;
    let distance = offset.length();

    if distance > 1e-5 {
        if distance >= capsule.radius {
            return None;
        }
        return Some(Contact {
            normal: offset / distance,
            depth: capsule.radius - distance,
        });
    }

    // Segment point inside the box: push out through the nearest face.
    let faces = [
        (p.x - aabb.min.x, -Vec3::X),
        (aabb.max.x - p.x, Vec3::X),
        (p.y - aabb.min.y, -Vec3::Y),
        (aabb.max.y - p.y, Vec3::Y),
        (p.z - aabb.min.z, -Vec3::Z),
        (aabb.max.z - p.z, Vec3::Z),
    ];
    let (gap, normal) = faces
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .unwrap_or((0.0, Vec3::Y));
    Some(Contact {
        normal,
        depth: gap + capsule.radius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> CollisionWorld {
        CollisionWorld::new(vec![Aabb::new(
            Vec3::new(-10.0, -1.0, -10.0),
            Vec3::new(10.0, 0.0, 10.0),
        )])
    }

    #[test]
    fn capsule_resting_into_floor_gets_upward_normal() {
        let capsule = Capsule::new(Vec3::new(0.0, 0.3, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.35);
        let contact = floor().capsule_intersect(&capsule).expect("contact");
        assert!(contact.normal.y > 0.99);
        assert!((contact.depth - 0.05).abs() < 1e-3);
    }

    #[test]
    fn capsule_above_floor_has_no_contact() {
        let capsule = Capsule::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, 1.2, 0.0), 0.35);
        assert_eq!(floor().capsule_intersect(&capsule), None);
    }

    #[test]
    fn wall_contact_pushes_sideways() {
        let world = CollisionWorld::new(vec![Aabb::new(
            Vec3::new(1.0, 0.0, -5.0),
            Vec3::new(2.0, 3.0, 5.0),
        )]);
        let capsule = Capsule::new(Vec3::new(0.8, 0.5, 0.0), Vec3::new(0.8, 1.2, 0.0), 0.35);
        let contact = world.capsule_intersect(&capsule).expect("contact");
        assert!(contact.normal.x < -0.99);
        assert!(contact.normal.y.abs() < 1e-3);
    }

    #[test]
    fn deepest_contact_wins() {
        let world = CollisionWorld::new(vec![
            Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0)),
            Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.2, 5.0)),
        ]);
        let capsule = Capsule::new(Vec3::new(0.0, 0.3, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.35);
        let contact = world.capsule_intersect(&capsule).expect("contact");
        assert!((contact.depth - 0.25).abs() < 1e-3);
    }

    #[test]
    fn buried_segment_exits_through_nearest_face() {
        let capsule = Capsule::new(Vec3::new(0.0, -0.2, 0.0), Vec3::new(0.0, -0.1, 0.0), 0.35);
        let contact = floor().capsule_intersect(&capsule).expect("contact");
        assert_eq!(contact.normal, Vec3::Y);
        assert!(contact.depth > 0.35);
    }
}
