use std::collections::HashMap;

use engine::tween::{Animatable, Easing, Position, Property, Timeline, Tween, Tweener};

#[derive(Default)]
struct Channels {
    values: HashMap<(String, Property), f32>,
}

impl Channels {
    fn with(mut self, target: &str, property: Property, value: f32) -> Self {
        self.values.insert((target.to_string(), property), value);
        self
    }

    fn value(&self, target: &str, property: Property) -> f32 {
        self.values[&(target.to_string(), property)]
    }
}

impl Animatable for Channels {
    fn get(&self, target: &str, property: Property) -> Option<f32> {
        self.values.get(&(target.to_string(), property)).copied()
    }

    fn set(&mut self, target: &str, property: Property, value: f32) {
        if let Some(slot) = self.values.get_mut(&(target.to_string(), property)) {
            *slot = value;
        }
    }
}

fn step(tweener: &mut Tweener<&'static str>, channels: &mut Channels, secs: f32) -> Vec<&'static str> {
    let mut done = Vec::new();
    for _ in 0..(secs / 0.01).round() as usize {
        done.extend(tweener.advance(0.01, channels));
    }
    done
}

#[test]
fn positions_follow_timeline_rules() {
    let timeline: Timeline<()> = Timeline::new(Easing::Linear)
        .to(Tween::new(1.0), Position::End)
        .to(Tween::new(0.5), Position::WithPrevious)
        .to(Tween::new(0.25), Position::AfterPrevious)
        .to(Tween::new(0.5), Position::End)
        .to(Tween::new(0.1), Position::At(0.2));
    assert_eq!(timeline.starts(), vec![0.0, 0.0, 0.5, 1.0, 0.2]);
    assert!((timeline.duration() - 1.5).abs() < 1e-6);
}

#[test]
fn later_steps_start_from_the_value_earlier_steps_left() {
    let mut channels = Channels::default().with("box", Property::PositionY, 0.0);
    let mut tweener = Tweener::new();
    tweener.play(
        Timeline::new(Easing::Linear)
            .to(Tween::new(0.5).track("box", Property::PositionY, 2.0), Position::End)
            .to(
                Tween::new(0.5)
                    .track("box", Property::PositionY, 1.0)
                    .on_complete("landed"),
                Position::End,
            ),
    );

    step(&mut tweener, &mut channels, 0.5);
    assert!((channels.value("box", Property::PositionY) - 2.0).abs() < 1e-4);

    let done = step(&mut tweener, &mut channels, 0.25);
    assert!(done.is_empty());
    assert!((channels.value("box", Property::PositionY) - 1.5).abs() < 1e-3);

    let done = step(&mut tweener, &mut channels, 0.3);
    assert_eq!(done, vec!["landed"]);
    assert!((channels.value("box", Property::PositionY) - 1.0).abs() < 1e-6);
    assert!(tweener.is_idle());
}

#[test]
fn missing_channels_are_skipped() {
    let mut channels = Channels::default().with("lamp", Property::Intensity, 1.0);
    let mut tweener = Tweener::new();
    tweener.play(
        Timeline::new(Easing::Linear).to(
            Tween::new(0.2)
                .track("lamp", Property::Intensity, 0.0)
                .track("ghost", Property::ScaleX, 9.0)
                .on_complete("faded"),
            Position::End,
        ),
    );
    assert_eq!(step(&mut tweener, &mut channels, 0.3), vec!["faded"]);
    assert_eq!(channels.value("lamp", Property::Intensity), 0.0);
    assert!(channels.get("ghost", Property::ScaleX).is_none());
}
