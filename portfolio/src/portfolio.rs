//! The interactive page: owns the scene, the camera and all page state, and turns input into
//! scene changes, sounds and outward effects.

use std::path::Path;
use std::time::Duration;

use engine::audio::AudioBackend;
use engine::camera::{OrbitConfig, OrbitControls, OrthoCamera};
use engine::collision::CollisionWorld;
use engine::scene::{SceneGraph, color_to_vec3};
use engine::surface::SurfaceSize;
use glam::{Vec2, Vec3};

use crate::content::CHARACTER;
use crate::error::PortfolioError;
use crate::input::Direction;
use crate::interaction::{Action, InteractionTable};
use crate::lifecycle::{LifecycleEffect, LifecycleEvent};
use crate::movement::Player;
use crate::picking::{PickPolicy, Picker};
use crate::sfx::{SoundId, SoundRegistry};
use crate::state::PortfolioState;
use crate::view_tree::UiAction;

pub const CAMERA_POSITION: Vec3 = Vec3::new(60.0, 45.0, 67.0);
pub const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const CAMERA_ZOOM: f32 = 15.0;
/// Physics never steps further than this in one frame.
pub const MAX_PHYSICS_STEP: f32 = 0.05;

/// Outward requests the host carries out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenUrl(String),
    SetPointerCursor(bool),
}

/// Loads the scene file; on failure logs and returns an empty scene.
pub fn load_scene_or_empty(path: &Path) -> SceneGraph {
    match load_scene(path) {
        Ok(scene) => scene,
        Err(err) => {
            log::error!("{err}; continuing with an empty scene");
            SceneGraph::empty()
        }
    }
}

pub fn load_scene(path: &Path) -> Result<SceneGraph, PortfolioError> {
    let scene = SceneGraph::load(path)?;
    log::info!("loaded {} scene nodes from {}", scene.len(), path.display());
    Ok(scene)
}

pub struct Portfolio<B: AudioBackend> {
    pub state: PortfolioState,
    pub scene: SceneGraph,
    pub camera: OrthoCamera,
    pub orbit: OrbitControls,
    picker: Picker,
    collision: CollisionWorld,
    table: InteractionTable,
    sounds: SoundRegistry<B>,
}

impl<B: AudioBackend> Portfolio<B> {
    pub fn new(
        scene: SceneGraph,
        sounds: SoundRegistry<B>,
        viewport: SurfaceSize,
        policy: PickPolicy,
    ) -> Self {
        let picker = Picker::from_scene(&scene, policy);
        let collision = CollisionWorld::new(scene.collision_boxes());
        let player = scene
            .transform(CHARACTER)
            .map(|t| Player::new(t.position, t.rotation.y));
        if player.is_none() {
            log::warn!("scene has no {CHARACTER} node; movement disabled");
        }
        let mut scene = scene;
        scene.background = color_to_vec3(crate::theme::Theme::default().background());
        Self {
            state: PortfolioState::new(viewport, player),
            camera: OrthoCamera::new(CAMERA_POSITION, CAMERA_TARGET, viewport.aspect(), CAMERA_ZOOM),
            orbit: OrbitControls::new(OrbitConfig::default()),
            scene,
            picker,
            collision,
            table: InteractionTable::default(),
            sounds,
        }
    }

    pub fn sounds(&self) -> &SoundRegistry<B> {
        &self.sounds
    }

    pub fn sounds_mut(&mut self) -> &mut SoundRegistry<B> {
        &mut self.sounds
    }

    pub fn is_muted(&self) -> bool {
        self.sounds.is_muted()
    }

    pub fn assets_loaded(&mut self) {
        let (next, _) = self.state.lifecycle.handle(LifecycleEvent::AssetsLoaded);
        self.state.lifecycle = next;
    }

    pub fn enter(&mut self) {
        let (next, effect) = self.state.lifecycle.handle(LifecycleEvent::Enter);
        self.state.lifecycle = next;
        if effect == LifecycleEffect::StartAudio {
            self.sounds.play(SoundId::Projects);
            self.sounds.enable_music();
        }
    }

    pub fn resize(&mut self, viewport: SurfaceSize) {
        if viewport.is_empty() {
            return;
        }
        self.state.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
    }

    pub fn pointer_moved(&mut self, ndc: Vec2) {
        self.state.input.pointer_moved(ndc);
    }

    /// Mouse click on the scene. Swallowed right after a touch tap.
    pub fn mouse_click(&mut self, ndc: Vec2) -> Vec<Effect> {
        if !self.state.input.accepts_click() {
            return Vec::new();
        }
        self.state.input.pointer = ndc;
        self.interact()
    }

    pub fn touch_end(&mut self, ndc: Vec2) -> Vec<Effect> {
        self.state.input.touch_ended(ndc);
        self.interact()
    }

    /// Picks at the last pointer position and dispatches.
    pub fn interact(&mut self) -> Vec<Effect> {
        if !self.state.lifecycle.accepts_scene_clicks() || self.state.is_modal_open() {
            return Vec::new();
        }
        let Some(name) = self
            .picker
            .pick(&self.scene, &self.camera, self.state.input.pointer)
        else {
            return Vec::new();
        };
        log::debug!("clicked {name}");
        let action = self.table.resolve(&name);
        self.dispatch(action)
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        if let Some(sound) = action.sound() {
            self.sounds.play(sound);
        }
        match action {
            Action::OpenLink(url) => return vec![Effect::OpenUrl(url.to_string())],
            Action::ToggleAudio => self.toggle_audio(),
            Action::ToggleTheme => self.toggle_theme(),
            Action::PlayBounce(name) => {
                self.state.animator.play_bounce(&self.scene, &name);
            }
            Action::PlayChairSpin => {
                self.state.animator.play_chair_spin(&self.scene);
            }
            Action::OpenModal(name) => {
                self.state.modal.open(&name);
            }
        }
        Vec::new()
    }

    pub fn toggle_audio(&mut self) {
        self.sounds.play(SoundId::Projects);
        let muted = self.sounds.toggle_muted();
        log::info!("audio {}", if muted { "muted" } else { "on" });
    }

    pub fn toggle_theme(&mut self) {
        let theme = self.state.theme.toggled();
        self.state.theme = theme;
        self.scene.background = color_to_vec3(theme.background());
        self.state.animator.play_theme(theme);
    }

    pub fn close_modal(&mut self) {
        self.state.modal.close();
        self.sounds.play(SoundId::Projects);
    }

    /// Overlay button presses; these bypass the open-modal guard.
    pub fn handle_ui(&mut self, action: &UiAction) -> Vec<Effect> {
        match action {
            UiAction::Enter => self.enter(),
            UiAction::CloseModal => self.close_modal(),
            UiAction::PrevImage => self.state.modal.previous(),
            UiAction::NextImage => self.state.modal.next(),
            UiAction::VisitLink => {
                if let Some(url) = self.state.modal.link() {
                    return vec![Effect::OpenUrl(url.to_string())];
                }
            }
            UiAction::ToggleTheme => self.toggle_theme(),
            UiAction::ToggleAudio => self.toggle_audio(),
            UiAction::MobileDirection(dir) => {
                self.state.input.set(*dir, true);
                self.state.mobile_held = Some(*dir);
            }
        }
        Vec::new()
    }

    pub fn key_pressed(&mut self, dir: Direction) {
        self.state.input.set(dir, true);
    }

    pub fn key_released(&mut self, dir: Direction) {
        self.state.input.set(dir, false);
    }

    /// Pointer released anywhere: lets go of an on-screen arrow.
    pub fn pointer_released(&mut self) {
        if let Some(dir) = self.state.mobile_held.take() {
            self.state.input.set(dir, false);
        }
    }

    pub fn focus_lost(&mut self) {
        self.state.input.release_all();
        self.state.mobile_held = None;
    }

    pub fn respawn(&mut self) {
        if let Some(player) = &mut self.state.player {
            player.respawn();
        }
        self.sync_character();
    }

    fn sync_character(&mut self) {
        let Some(player) = self.state.player else {
            return;
        };
        if let Some(t) = self.scene.transform_mut(CHARACTER) {
            t.position = player.position;
            t.rotation.y = player.facing;
        }
    }

    /// One frame: loading text, camera damping, movement, timelines and hover.
    pub fn update(&mut self, dt: Duration) -> Vec<Effect> {
        let secs = dt.as_secs_f32();
        self.state.loading.advance(dt);
        self.orbit.update(&mut self.camera);

        if let Some(player) = &mut self.state.player {
            if player.start_move(&self.state.input) {
                self.sounds.play(SoundId::Jump);
                self.state.animator.play_jump_squash(&self.scene, CHARACTER);
            }
            player.step(secs.min(MAX_PHYSICS_STEP), &self.collision);
        }
        self.sync_character();

        self.state.animator.update(secs, &mut self.scene);

        let hovered = self
            .picker
            .hover(&self.scene, &self.camera, self.state.input.pointer);
        let mut effects = Vec::new();
        if hovered != self.state.hovered {
            effects.push(Effect::SetPointerCursor(hovered));
        }
        self.state.hovered = hovered;
        effects
    }
}
