//! Scripted one-shot animations built as timelines over the scene graph.

use std::collections::{HashMap, HashSet};
use std::f32::consts::FRAC_PI_2;

use engine::scene::{AMBIENT_LIGHT, SUN_LIGHT, SceneGraph};
use engine::tween::{Easing, Position, Property, Timeline, Tween, Tweener};
use glam::Vec3;

use crate::content::CHAIR;
use crate::theme::Theme;

pub const BOUNCE_HEIGHT: f32 = 0.3;
pub const BOUNCE_DURATION: f32 = 0.5;
pub const THEME_FADE_SECS: f32 = 1.0;

/// Completion tokens handed back by the tweener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimDone {
    /// The named actor landed and may bounce again.
    ActorReady(String),
}

fn scale_to(name: &str, rest: Vec3, factors: [f32; 3], duration: f32, ease: Easing) -> Tween<AnimDone> {
    Tween::new(duration)
        .track3(
            name,
            Property::SCALE,
            [rest.x * factors[0], rest.y * factors[1], rest.z * factors[2]],
        )
        .ease(ease)
}

/// Squash, stretch and hop. Scale factors apply to `rest_scale`.
pub fn bounce(scene: &SceneGraph, name: &str, rest_scale: Vec3) -> Option<Timeline<AnimDone>> {
    let rest_y = scene.transform(name)?.position.y;
    let d = BOUNCE_DURATION;
    Some(
        Timeline::new(Easing::Linear)
            .to(
                scale_to(name, rest_scale, [1.2, 0.8, 1.2], d * 0.2, Easing::Power2Out),
                Position::End,
            )
            .to(
                scale_to(name, rest_scale, [0.8, 1.3, 0.8], d * 0.3, Easing::Power2Out),
                Position::End,
            )
            .to(
                Tween::new(d * 0.5)
                    .track(name, Property::PositionY, rest_y + BOUNCE_HEIGHT)
                    .ease(Easing::Power2Out),
                Position::WithPrevious,
            )
            .to(
                scale_to(name, rest_scale, [1.0, 1.0, 1.0], d * 0.3, Easing::Power1InOut),
                Position::End,
            )
            .to(
                Tween::new(d * 0.5)
                    .track(name, Property::PositionY, rest_y)
                    .ease(Easing::BounceOut)
                    .on_complete(AnimDone::ActorReady(name.to_string())),
                Position::AfterPrevious,
            )
            .to(
                scale_to(name, rest_scale, [1.0, 1.0, 1.0], d * 0.2, Easing::ELASTIC_OUT),
                Position::End,
            ),
    )
}

/// Nudge the chair forward with a quarter turn, then back.
pub fn chair_spin(scene: &SceneGraph) -> Option<Timeline<AnimDone>> {
    let t = scene.transform(CHAIR)?;
    let (z, rot_y) = (t.position.z, t.rotation.y);
    Some(
        Timeline::new(Easing::Power2Out)
            .to(
                Tween::new(0.4).track(CHAIR, Property::PositionZ, z - 0.3),
                Position::End,
            )
            .to(
                Tween::new(0.6).track(CHAIR, Property::RotationY, rot_y + FRAC_PI_2),
                Position::WithPrevious,
            )
            .to(Tween::new(0.4).track(CHAIR, Property::PositionZ, z), Position::End)
            .to(
                Tween::new(1.0).track(CHAIR, Property::RotationY, rot_y),
                Position::WithPrevious,
            ),
    )
}

/// Small squash on the character as it hops.
pub fn jump_squash(name: &str, rest_scale: Vec3) -> Timeline<AnimDone> {
    Timeline::new(Easing::Linear)
        .to(
            scale_to(name, rest_scale, [1.08, 0.9, 1.08], 0.1, Easing::Power2Out),
            Position::End,
        )
        .to(
            scale_to(name, rest_scale, [0.92, 1.1, 0.92], 0.15, Easing::Power2Out),
            Position::End,
        )
        .to(
            scale_to(name, rest_scale, [1.0, 1.0, 1.0], 0.15, Easing::Power1InOut),
            Position::End,
        )
        .to(
            scale_to(name, rest_scale, [1.0, 1.0, 1.0], 0.1, Easing::Power2Out),
            Position::End,
        )
}

/// Fades both lights toward `theme`.
pub fn theme_lights(theme: Theme) -> Timeline<AnimDone> {
    let look = theme.lighting();
    let fade = |target: &str, color: Vec3, intensity: f32| {
        Tween::new(THEME_FADE_SECS)
            .track3(target, Property::COLOR, color.to_array())
            .track(target, Property::Intensity, intensity)
    };
    Timeline::new(Easing::Power2InOut)
        .to(
            fade(AMBIENT_LIGHT, look.ambient_color, look.ambient_intensity),
            Position::At(0.0),
        )
        .to(
            fade(SUN_LIGHT, look.sun_color, look.sun_intensity),
            Position::At(0.0),
        )
}

/// Runs every scene animation and tracks which actors are mid-bounce.
#[derive(Debug, Default)]
pub struct Animator {
    tweener: Tweener<AnimDone>,
    in_flight: HashSet<String>,
    rest_scales: HashMap<String, Vec3>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    fn rest_scale(&mut self, scene: &SceneGraph, name: &str) -> Option<Vec3> {
        if let Some(scale) = self.rest_scales.get(name) {
            return Some(*scale);
        }
        let scale = scene.transform(name)?.scale;
        self.rest_scales.insert(name.to_string(), scale);
        Some(scale)
    }

    pub fn is_in_flight(&self, name: &str) -> bool {
        self.in_flight.contains(name)
    }

    /// Starts a bounce unless that actor is already bouncing. Returns whether it started.
    pub fn play_bounce(&mut self, scene: &SceneGraph, name: &str) -> bool {
        if self.in_flight.contains(name) {
            return false;
        }
        let Some(rest) = self.rest_scale(scene, name) else {
            log::debug!("bounce target {name:?} not in scene");
            return false;
        };
        let Some(timeline) = bounce(scene, name, rest) else {
            return false;
        };
        self.in_flight.insert(name.to_string());
        self.tweener.play(timeline);
        true
    }

    /// Not guarded: a second click overlaps the running spin.
    pub fn play_chair_spin(&mut self, scene: &SceneGraph) -> bool {
        match chair_spin(scene) {
            Some(timeline) => {
                self.tweener.play(timeline);
                true
            }
            None => {
                log::debug!("no chair in scene");
                false
            }
        }
    }

    pub fn play_jump_squash(&mut self, scene: &SceneGraph, name: &str) {
        if let Some(rest) = self.rest_scale(scene, name) {
            self.tweener.play(jump_squash(name, rest));
        }
    }

    pub fn play_theme(&mut self, theme: Theme) {
        self.tweener.play(theme_lights(theme));
    }

    pub fn active(&self) -> usize {
        self.tweener.active()
    }

    pub fn update(&mut self, dt: f32, scene: &mut SceneGraph) -> Vec<AnimDone> {
        let done = self.tweener.advance(dt, scene);
        for token in &done {
            match token {
                AnimDone::ActorReady(name) => {
                    self.in_flight.remove(name);
                }
            }
        }
        done
    }
}
