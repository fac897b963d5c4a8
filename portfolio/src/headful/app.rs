//! Window host: feeds winit input into [`Portfolio`] and carries out its effects.

use std::path::PathBuf;
use std::time::Duration;

use engine::app::{AppContext, GameApp, InputFrame};
use engine::audio::AudioBackend;
use engine::graphics::Renderer2d;
use engine::surface::SurfaceSize;
use engine::view_tree::ViewTree;
use glam::Vec2;

use crate::headful::audio::RodioAudio;
use crate::headful::browser::open_url;
use crate::headful::input_adapter::{KeyCommand, key_commands, pixel_to_ndc};
use crate::picking::PickPolicy;
use crate::portfolio::{Effect, Portfolio, load_scene_or_empty};
use crate::render::draw_frame;
use crate::settings::PlayerSettings;
use crate::sfx::SoundRegistry;
use crate::view_tree::{UiAction, build_view};

/// Applies one frame of window input, then advances the page by `dt`.
///
/// Overlay actions run first; scene clicks and camera drags only count when the overlay does not
/// own the pointer.
pub fn route_frame<B: AudioBackend>(
    portfolio: &mut Portfolio<B>,
    input: &InputFrame,
    actions: &[UiAction],
    size: SurfaceSize,
    dt: Duration,
) -> Vec<Effect> {
    let mut effects = Vec::new();

    if let Some(resized) = input.resized {
        portfolio.resize(resized);
    }
    if input.focus_lost {
        portfolio.focus_lost();
    }

    let (pressed, released) = key_commands(input);
    for command in pressed {
        match command {
            KeyCommand::Move(dir) => portfolio.key_pressed(dir),
            KeyCommand::Respawn => portfolio.respawn(),
        }
    }
    for dir in released {
        portfolio.key_released(dir);
    }

    if input.cursor_moved {
        if let Some(pos) = input.mouse_pos {
            portfolio.pointer_moved(pixel_to_ndc(size, pos));
        }
    }

    for action in actions {
        effects.extend(portfolio.handle_ui(action));
    }

    if !input.pointer_over_ui {
        let (dx, dy) = input.drag_delta;
        if dx != 0.0 || dy != 0.0 {
            portfolio.orbit.rotate(dx, dy, size.height as f32);
        }
        let (px, py) = input.pan_delta;
        if px != 0.0 || py != 0.0 {
            let viewport = Vec2::new(size.width as f32, size.height as f32);
            portfolio.orbit.pan(&portfolio.camera, px, py, viewport);
        }
        if input.wheel != 0.0 {
            portfolio.orbit.dolly(&mut portfolio.camera, input.wheel);
        }
        if let Some(pos) = input.touch_end {
            effects.extend(portfolio.touch_end(pixel_to_ndc(size, pos)));
        }
        if let Some(pos) = input.click {
            effects.extend(portfolio.mouse_click(pixel_to_ndc(size, pos)));
        }
    }

    effects.extend(portfolio.update(dt));

    // After the update so a quick tap on an arrow still starts a hop.
    if input.mouse_up {
        portfolio.pointer_released();
    }
    effects
}

pub struct LaunchOptions {
    pub scene_path: PathBuf,
    pub assets_dir: PathBuf,
    pub settings: PlayerSettings,
    pub pick_policy: PickPolicy,
}

pub struct PortfolioApp {
    options: LaunchOptions,
}

impl PortfolioApp {
    pub fn new(options: LaunchOptions) -> Self {
        Self { options }
    }
}

impl GameApp for PortfolioApp {
    type State = Portfolio<RodioAudio>;
    type Action = UiAction;
    type Effect = Effect;

    fn init_state(&mut self, ctx: &mut AppContext) -> Self::State {
        let scene = load_scene_or_empty(&self.options.scene_path);
        let audio = RodioAudio::open();
        let sounds = SoundRegistry::load(audio, &self.options.assets_dir, self.options.settings.audio);
        let mut portfolio = Portfolio::new(scene, sounds, ctx.buffer_size(), self.options.pick_policy);
        portfolio.assets_loaded();
        portfolio
    }

    fn build_view(&self, state: &Self::State, _ctx: &AppContext) -> ViewTree<UiAction> {
        build_view(&state.state, state.is_muted())
    }

    fn update_state(
        &mut self,
        state: &mut Self::State,
        input: &InputFrame,
        dt: Duration,
        actions: &[UiAction],
        ctx: &mut AppContext,
    ) -> Vec<Effect> {
        route_frame(state, input, actions, ctx.buffer_size(), dt)
    }

    fn render(&mut self, state: &Self::State, view: &ViewTree<UiAction>, renderer: &mut dyn Renderer2d) {
        draw_frame(&state.scene, &state.camera, view, renderer);
    }

    fn handle_effects(&mut self, effects: Vec<Effect>, ctx: &mut AppContext) {
        for effect in effects {
            match effect {
                Effect::OpenUrl(url) => {
                    log::info!("opening {url}");
                    if let Err(err) = open_url(&url) {
                        log::warn!("could not open {url}: {err}");
                    }
                }
                Effect::SetPointerCursor(pointer) => ctx.set_pointer_cursor(pointer),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Direction;
    use crate::settings::AudioSettings;
    use engine::audio::AudioLog;
    use engine::scene::SceneGraph;
    use std::path::Path;

    fn portfolio() -> Portfolio<AudioLog> {
        let sounds = SoundRegistry::load(AudioLog::new(), Path::new("assets"), AudioSettings::default());
        let mut p = Portfolio::new(SceneGraph::empty(), sounds, SurfaceSize::new(200, 100), PickPolicy::default());
        p.assets_loaded();
        p.enter();
        p
    }

    #[test]
    fn held_arrow_is_released_after_the_frame() {
        let mut p = portfolio();
        let input = InputFrame {
            mouse_down: true,
            mouse_up: true,
            ..InputFrame::default()
        };
        route_frame(
            &mut p,
            &input,
            &[UiAction::MobileDirection(Direction::Up)],
            SurfaceSize::new(200, 100),
            Duration::from_millis(16),
        );
        assert!(!p.state.input.any_held());
        assert!(p.state.mobile_held.is_none());
    }

    #[test]
    fn overlay_pointer_blocks_camera_drag() {
        let mut p = portfolio();
        let before = p.camera;
        let input = InputFrame {
            drag_delta: (40.0, 0.0),
            pointer_over_ui: true,
            ..InputFrame::default()
        };
        route_frame(&mut p, &input, &[], SurfaceSize::new(200, 100), Duration::from_millis(16));
        assert!(p.camera.position.distance(before.position) < 1e-3);
    }

    #[test]
    fn key_release_stops_holding() {
        use winit::event::VirtualKeyCode;
        let mut p = portfolio();
        let size = SurfaceSize::new(200, 100);
        let press = InputFrame {
            keys_pressed: vec![VirtualKeyCode::W],
            ..InputFrame::default()
        };
        route_frame(&mut p, &press, &[], size, Duration::ZERO);
        assert!(p.state.input.is_held(Direction::Up));
        let release = InputFrame {
            keys_released: vec![VirtualKeyCode::W],
            ..InputFrame::default()
        };
        route_frame(&mut p, &release, &[], size, Duration::ZERO);
        assert!(!p.state.input.any_held());
    }
}
