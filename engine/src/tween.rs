//! Keyframe timelines over scalar node properties.
//!
//! A [`Timeline`] is a list of [`Tween`]s scheduled at fixed offsets. The [`Tweener`] runs any
//! number of timelines against an [`Animatable`] target and hands back completion tokens instead
//! of invoking callbacks.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    /// Quadratic in/out.
    Power1InOut,
    /// Cubic out.
    Power2Out,
    /// Cubic in/out.
    Power2InOut,
    BounceOut,
    ElasticOut { amplitude: f32, period: f32 },
}

impl Easing {
    pub const ELASTIC_OUT: Easing = Easing::ElasticOut {
        amplitude: 1.0,
        period: 0.3,
    };

    /// Maps linear progress `t` in 0..=1 to eased progress. Endpoints are exact.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
            Easing::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::BounceOut => bounce_out(t),
            Easing::ElasticOut { amplitude, period } => {
                let a = amplitude.max(1.0);
                let p = period.max(1e-3);
                let shift = p / TAU * (1.0 / a).asin();
                a * 2f32.powf(-10.0 * t) * ((t - shift) * TAU / p).sin() + 1.0
            }
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// A scalar channel on a scene node or light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
    ScaleX,
    ScaleY,
    ScaleZ,
    ColorR,
    ColorG,
    ColorB,
    Intensity,
}

impl Property {
    pub const POSITION: [Property; 3] = [Property::PositionX, Property::PositionY, Property::PositionZ];
    pub const ROTATION: [Property; 3] = [Property::RotationX, Property::RotationY, Property::RotationZ];
    pub const SCALE: [Property; 3] = [Property::ScaleX, Property::ScaleY, Property::ScaleZ];
    pub const COLOR: [Property; 3] = [Property::ColorR, Property::ColorG, Property::ColorB];
}

/// Anything whose named scalar channels a timeline can read and write.
pub trait Animatable {
    fn get(&self, target: &str, property: Property) -> Option<f32>;
    fn set(&mut self, target: &str, property: Property, value: f32);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub target: String,
    pub property: Property,
    pub to: f32,
}

/// One step of a timeline: a set of tracks sharing duration, easing and completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<C> {
    pub tracks: Vec<Track>,
    pub duration: f32,
    pub ease: Option<Easing>,
    pub on_complete: Option<C>,
}

impl<C> Tween<C> {
    pub fn new(duration: f32) -> Self {
        Self {
            tracks: Vec::new(),
            duration: duration.max(0.0),
            ease: None,
            on_complete: None,
        }
    }

    pub fn track(mut self, target: &str, property: Property, to: f32) -> Self {
        self.tracks.push(Track {
            target: target.to_string(),
            property,
            to,
        });
        self
    }

    /// Three tracks at once, e.g. all scale axes.
    pub fn track3(self, target: &str, properties: [Property; 3], to: [f32; 3]) -> Self {
        self.track(target, properties[0], to[0])
            .track(target, properties[1], to[1])
            .track(target, properties[2], to[2])
    }

    pub fn ease(mut self, ease: Easing) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn on_complete(mut self, token: C) -> Self {
        self.on_complete = Some(token);
        self
    }
}

/// Where a tween is placed relative to what is already on the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// After everything scheduled so far.
    End,
    /// Together with the previously added tween (`<`).
    WithPrevious,
    /// When the previously added tween ends (`>`).
    AfterPrevious,
    /// Absolute offset in seconds.
    At(f32),
}

#[derive(Debug, Clone, PartialEq)]
struct Scheduled<C> {
    start: f32,
    tween: Tween<C>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<C> {
    default_ease: Easing,
    items: Vec<Scheduled<C>>,
}

impl<C> Timeline<C> {
    pub fn new(default_ease: Easing) -> Self {
        Self {
            default_ease,
            items: Vec::new(),
        }
    }

    pub fn to(mut self, tween: Tween<C>, position: Position) -> Self {
        let start = match position {
            Position::End => self.duration(),
            Position::WithPrevious => self.items.last().map_or(0.0, |s| s.start),
            Position::AfterPrevious => self
                .items
                .last()
                .map_or(0.0, |s| s.start + s.tween.duration),
            Position::At(t) => t.max(0.0),
        };
        self.items.push(Scheduled { start, tween });
        self
    }

    pub fn duration(&self) -> f32 {
        self.items
            .iter()
            .map(|s| s.start + s.tween.duration)
            .fold(0.0, f32::max)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Start offsets in insertion order.
    pub fn starts(&self) -> Vec<f32> {
        self.items.iter().map(|s| s.start).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Pending,
    Running,
    Done,
}

#[derive(Debug)]
struct Running<C> {
    timeline: Timeline<C>,
    elapsed: f32,
    phases: Vec<Phase>,
    // Per item, per track captured start value.
    from: Vec<Vec<Option<f32>>>,
}

impl<C> Running<C> {
    fn new(timeline: Timeline<C>) -> Self {
        let phases = vec![Phase::Pending; timeline.items.len()];
        let from = timeline
            .items
            .iter()
            .map(|s| vec![None; s.tween.tracks.len()])
            .collect();
        Self {
            timeline,
            elapsed: 0.0,
            phases,
            from,
        }
    }

    fn finished(&self) -> bool {
        self.phases.iter().all(|p| *p == Phase::Done)
    }

    fn advance(&mut self, dt: f32, target: &mut impl Animatable, done: &mut Vec<C>) {
        self.elapsed += dt.max(0.0);
        let default_ease = self.timeline.default_ease;
        for (i, item) in self.timeline.items.iter_mut().enumerate() {
            if self.phases[i] == Phase::Done || self.elapsed < item.start {
                continue;
            }
            if self.phases[i] == Phase::Pending {
                for (slot, track) in self.from[i].iter_mut().zip(&item.tween.tracks) {
                    *slot = target.get(&track.target, track.property);
                }
                self.phases[i] = Phase::Running;
            }
            let progress = if item.tween.duration <= 0.0 {
                1.0
            } else {
                ((self.elapsed - item.start) / item.tween.duration).min(1.0)
            };
            let eased = item.tween.ease.unwrap_or(default_ease).apply(progress);
            for (from, track) in self.from[i].iter().zip(&item.tween.tracks) {
                // Channels the target does not expose are skipped.
                if let Some(from) = from {
                    target.set(&track.target, track.property, from + (track.to - from) * eased);
                }
            }
            if progress >= 1.0 {
                self.phases[i] = Phase::Done;
                if let Some(token) = item.tween.on_complete.take() {
                    done.push(token);
                }
            }
        }
    }
}

/// Runs timelines to completion, one `advance` per frame.
#[derive(Debug)]
pub struct Tweener<C> {
    running: Vec<Running<C>>,
}

impl<C> Default for Tweener<C> {
    fn default() -> Self {
        Self {
            running: Vec::new(),
        }
    }
}

impl<C> Tweener<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self, timeline: Timeline<C>) {
        if timeline.is_empty() {
            return;
        }
        self.running.push(Running::new(timeline));
    }

    pub fn active(&self) -> usize {
        self.running.len()
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Advances every timeline by `dt` seconds. Timelines run in the order they were started, so a
    /// later timeline wins when two write the same channel in one frame.
    pub fn advance(&mut self, dt: f32, target: &mut impl Animatable) -> Vec<C> {
        let mut done = Vec::new();
        for running in &mut self.running {
            running.advance(dt, target, &mut done);
        }
        self.running.retain(|r| !r.finished());
        done
    }
}

/// Shortest-path interpolation between two angles in radians.
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    let mut delta = (to - from) % TAU;
    if delta > PI {
        delta -= TAU;
    } else if delta < -PI {
        delta += TAU;
    }
    from + delta * t
}
