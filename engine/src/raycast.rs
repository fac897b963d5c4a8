use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self::new(center - half, center + half)
    }

    /// Bounds of a unit-centered box of `size` after `model` is applied.
    pub fn from_transformed_box(model: Mat4, size: Vec3) -> Self {
        let half = size * 0.5;
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in box_corners(half) {
            let p = model.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    pub fn expanded(&self, by: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(by),
            max: self.max + Vec3::splat(by),
        }
    }
}

/// The 8 corners of a box centered at the origin with half extents `half`.
pub fn box_corners(half: Vec3) -> [Vec3; 8] {
    [
        Vec3::new(-half.x, -half.y, -half.z),
        Vec3::new(half.x, -half.y, -half.z),
        Vec3::new(half.x, half.y, -half.z),
        Vec3::new(-half.x, half.y, -half.z),
        Vec3::new(-half.x, -half.y, half.z),
        Vec3::new(half.x, -half.y, half.z),
        Vec3::new(half.x, half.y, half.z),
        Vec3::new(-half.x, half.y, half.z),
    ]
}

/// Slab test. Returns the entry distance along the ray (0 if the origin is inside).
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let mut t_min = 0.0f32;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        if d.abs() < 1e-8 {
            if o < aabb.min[axis] || o > aabb.max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (aabb.min[axis] - o) * inv;
        let mut t1 = (aabb.max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    Some(t_min)
}

/// Ray against an oriented box: a unit-centered box of `size` placed by `model`.
///
/// The returned distance is measured in world units along `ray`.
pub fn ray_box(ray: &Ray, model: Mat4, size: Vec3) -> Option<f32> {
    if model.determinant().abs() < 1e-12 {
        return None;
    }
    let inv = model.inverse();
    let local = Ray {
        origin: inv.transform_point3(ray.origin),
        // Not renormalized: keeps the ray parameter identical in both spaces.
        direction: inv.transform_vector3(ray.direction),
    };
    ray_aabb(&local, &Aabb::from_center_half_extents(Vec3::ZERO, size * 0.5))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn ray_hits_box_in_front() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        let t = ray_aabb(&ray, &aabb).expect("hit");
        assert!((t - 9.0).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_box_behind_origin() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        assert_eq!(ray_aabb(&ray, &aabb), None);
    }

    #[test]
    fn ray_parallel_outside_slab_misses() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, -10.0), Vec3::Z);
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        assert_eq!(ray_aabb(&ray, &aabb), None);
    }

    #[test]
    fn ray_box_respects_rotation_and_scale() {
        // A 2x2x2 box scaled to 4 units along x and rotated 90 degrees about y now spans z in -4..4.
        let model = Mat4::from_scale_rotation_translation(
            Vec3::new(4.0, 1.0, 1.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::ZERO,
        );
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        let t = ray_box(&ray, model, Vec3::splat(2.0)).expect("hit");
        assert!((t - 6.0).abs() < 1e-4, "t = {t}");
    }

    #[test]
    fn transformed_box_bounds_include_translation() {
        let model = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let aabb = Aabb::from_transformed_box(model, Vec3::splat(2.0));
        assert!(aabb.contains(Vec3::new(5.5, 0.5, -0.5)));
        assert!(!aabb.contains(Vec3::ZERO));
    }
}
