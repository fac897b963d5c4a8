//! Hop-based character movement against the static collision boxes.

use std::f32::consts::{FRAC_PI_2, PI};

use engine::collision::{Capsule, CollisionWorld};
use engine::tween::lerp_angle;
use glam::Vec3;

use crate::input::{Direction, InputState};

pub const MOVE_SPEED: f32 = 7.0;
pub const JUMP_VELOCITY: f32 = 10.0;
pub const GRAVITY: f32 = 30.0;
pub const CAPSULE_RADIUS: f32 = 0.35;
pub const CAPSULE_HEIGHT: f32 = 1.0;
/// Falling below this height respawns the character.
pub const FALL_LIMIT: f32 = -20.0;
pub const FACING_LERP: f32 = 0.4;

impl Direction {
    /// Horizontal velocity contribution of one held key, before `MOVE_SPEED`.
    pub fn step(self) -> Vec3 {
        match self {
            Direction::Up => Vec3::Z,
            Direction::Down => Vec3::NEG_Z,
            Direction::Left => Vec3::X,
            Direction::Right => Vec3::NEG_X,
        }
    }

    /// Yaw the character turns to when this key drives the hop.
    pub fn facing(self) -> f32 {
        match self {
            Direction::Up => 0.0,
            Direction::Down => PI,
            Direction::Left => FRAC_PI_2,
            Direction::Right => -FRAC_PI_2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    pub is_moving: bool,
    pub on_floor: bool,
    pub spawn: Vec3,
    pub collider: Capsule,
    /// Current yaw in radians.
    pub facing: f32,
    pub target_facing: f32,
}

fn spawn_capsule(spawn: Vec3) -> Capsule {
    Capsule::new(
        spawn + Vec3::new(0.0, CAPSULE_RADIUS, 0.0),
        spawn + Vec3::new(0.0, CAPSULE_HEIGHT, 0.0),
        CAPSULE_RADIUS,
    )
}

impl Player {
    pub fn new(spawn: Vec3, facing: f32) -> Self {
        Self {
            position: spawn,
            velocity: Vec3::ZERO,
            is_moving: false,
            on_floor: false,
            spawn,
            collider: spawn_capsule(spawn),
            facing,
            target_facing: facing,
        }
    }

    pub fn respawn(&mut self) {
        self.position = self.spawn;
        self.collider = spawn_capsule(self.spawn);
        self.velocity = Vec3::ZERO;
        self.is_moving = false;
    }

    /// Starts a hop when a direction is held and no hop is underway.
    ///
    /// Returns true when a hop started; the caller plays the jump sound and squash.
    pub fn start_move(&mut self, input: &InputState) -> bool {
        if !input.any_held() || self.is_moving {
            return false;
        }
        for dir in input.held() {
            self.velocity += dir.step() * MOVE_SPEED;
            self.target_facing = dir.facing();
        }
        self.velocity.y = JUMP_VELOCITY;
        self.is_moving = true;
        true
    }

    /// One physics tick of `dt` seconds.
    pub fn step(&mut self, dt: f32, world: &CollisionWorld) {
        if self.position.y < FALL_LIMIT {
            log::debug!("character fell out of the world; respawning");
            self.respawn();
            return;
        }

        if !self.on_floor {
            self.velocity.y -= GRAVITY * dt;
        }
        self.collider.translate(self.velocity * dt);

        self.on_floor = false;
        if let Some(contact) = world.capsule_intersect(&self.collider) {
            self.on_floor = contact.normal.y > 0.0;
            self.collider.translate(contact.normal * contact.depth);
            if self.on_floor {
                self.is_moving = false;
                self.velocity = Vec3::ZERO;
            }
        }

        self.position = self.collider.start - Vec3::new(0.0, CAPSULE_RADIUS, 0.0);
        self.facing = lerp_angle(self.facing, self.target_facing, FACING_LERP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::raycast::Aabb;

    fn floor() -> CollisionWorld {
        CollisionWorld::new(vec![Aabb::new(
            Vec3::new(-50.0, -1.0, -50.0),
            Vec3::new(50.0, 0.0, 50.0),
        )])
    }

    fn held(dirs: &[Direction]) -> InputState {
        let mut input = InputState::default();
        for d in dirs {
            input.set(*d, true);
        }
        input
    }

    #[test]
    fn velocity_is_sum_of_held_directions() {
        let cases: &[(&[Direction], Vec3)] = &[
            (&[Direction::Up], Vec3::new(0.0, JUMP_VELOCITY, MOVE_SPEED)),
            (&[Direction::Left, Direction::Down], Vec3::new(MOVE_SPEED, JUMP_VELOCITY, -MOVE_SPEED)),
            (&[Direction::Left, Direction::Right], Vec3::new(0.0, JUMP_VELOCITY, 0.0)),
        ];
        for (dirs, expected) in cases {
            let mut player = Player::new(Vec3::ZERO, 0.0);
            assert!(player.start_move(&held(dirs)));
            assert_eq!(player.velocity, *expected, "{dirs:?}");
        }
    }

    #[test]
    fn last_held_key_sets_facing() {
        let mut player = Player::new(Vec3::ZERO, 0.0);
        player.start_move(&held(&[Direction::Up, Direction::Right]));
        assert_eq!(player.target_facing, -FRAC_PI_2);
    }

    #[test]
    fn no_new_hop_while_moving() {
        let mut player = Player::new(Vec3::ZERO, 0.0);
        assert!(player.start_move(&held(&[Direction::Up])));
        assert!(!player.start_move(&held(&[Direction::Up])));
        assert_eq!(player.velocity.z, MOVE_SPEED);
    }

    #[test]
    fn hop_lands_and_stops() {
        let world = floor();
        let mut player = Player::new(Vec3::ZERO, 0.0);
        player.start_move(&held(&[Direction::Up]));
        for _ in 0..200 {
            player.step(0.01, &world);
            if !player.is_moving {
                break;
            }
        }
        assert!(!player.is_moving);
        assert_eq!(player.velocity, Vec3::ZERO);
        assert!(player.position.z > 3.0, "moved forward: {:?}", player.position);
        assert!(player.position.y.abs() < 0.05);
    }

    #[test]
    fn falling_out_of_world_respawns() {
        let world = CollisionWorld::default();
        let spawn = Vec3::new(1.0, 2.0, 3.0);
        let mut player = Player::new(spawn, 0.0);
        for _ in 0..400 {
            if player.position.y < FALL_LIMIT {
                break;
            }
            player.step(0.035, &world);
        }
        assert!(player.position.y < FALL_LIMIT);
        player.step(0.035, &world);
        assert_eq!(player.position, spawn);
        assert_eq!(player.velocity, Vec3::ZERO);
    }

    #[test]
    fn respawn_resets_everything() {
        let spawn = Vec3::new(1.0, 0.0, -2.0);
        let mut player = Player::new(spawn, 0.0);
        player.start_move(&held(&[Direction::Down]));
        player.step(0.1, &CollisionWorld::default());
        player.respawn();
        assert_eq!(player.position, spawn);
        assert_eq!(player.velocity, Vec3::ZERO);
        assert!(!player.is_moving);
        assert_eq!(player.collider.start, spawn + Vec3::new(0.0, CAPSULE_RADIUS, 0.0));
        assert_eq!(player.collider.end, spawn + Vec3::new(0.0, CAPSULE_HEIGHT, 0.0));
    }

    #[test]
    fn facing_turns_the_short_way() {
        let mut player = Player::new(Vec3::ZERO, 0.0);
        player.facing = PI - 0.1;
        player.target_facing = -PI + 0.1;
        player.on_floor = true;
        player.step(0.0, &floor());
        assert!(player.facing > PI - 0.1);
    }
}
