use std::path::Path;
use std::time::Duration;

use engine::audio::{AudioCall, AudioLog};
use engine::scene::{SceneGraph, color_to_vec3};
use engine::surface::SurfaceSize;
use glam::{Vec2, Vec3};
use portfolio::content::{EXTERNAL_LINKS, INTERACTABLE};
use portfolio::lifecycle::Lifecycle;
use portfolio::picking::PickPolicy;
use portfolio::portfolio::{Effect, Portfolio, load_scene_or_empty};
use portfolio::settings::{AudioSettings, SettingsStore};
use portfolio::sfx::{MusicState, SoundRegistry};
use portfolio::theme::{DARK_BACKGROUND, Theme};
use portfolio::view_tree::UiAction;

// Objects sit on a line across the view direction so none hides another.
const ROOM: &str = r##"{
    "nodes": [
        { "name": "Floor", "position": [0.0, -0.5, 0.0], "collidable": true,
          "mesh": { "size": [40.0, 1.0, 40.0], "color": "#c9a27a" } },
        { "name": "PC", "position": [-10.05, 0.75, 9.0],
          "mesh": { "size": [1.5, 1.5, 1.5], "color": "#2a2a2e" } },
        { "name": "Basket", "position": [-6.7, 0.75, 6.0],
          "mesh": { "size": [1.5, 1.5, 1.5], "color": "#b07a3c" } },
        { "name": "Speakers", "position": [-3.35, 0.75, 3.0],
          "children": [
            { "name": "Speaker_Box", "mesh": { "size": [1.5, 1.5, 1.5], "color": "#222222" } }
          ] },
        { "name": "Character", "position": [0.0, 0.0, 0.0],
          "children": [
            { "name": "Character_Body", "position": [0.0, 0.45, 0.0],
              "mesh": { "size": [0.7, 0.9, 0.7], "color": "#f2c14e" } }
          ] },
        { "name": "Lamp", "position": [3.35, 0.75, -3.0],
          "mesh": { "size": [1.5, 1.5, 1.5], "color": "#f6e7a1" } },
        { "name": "Chair", "position": [6.7, 0.75, -6.0],
          "mesh": { "size": [1.5, 1.5, 1.5], "color": "#394a6b" } },
        { "name": "Linkedin", "position": [10.05, 0.75, -9.0],
          "mesh": { "size": [1.5, 1.5, 1.5], "color": "#0a66c2" } }
    ]
}"##;

fn portfolio_with(audio: AudioSettings) -> Portfolio<AudioLog> {
    let scene = SceneGraph::from_json_str(ROOM).expect("test scene parses");
    let sounds = SoundRegistry::load(AudioLog::new(), Path::new("assets"), audio);
    let mut p = Portfolio::new(scene, sounds, SurfaceSize::new(200, 100), PickPolicy::NearestOnly);
    p.camera.zoom = 5.0;
    p.sounds_mut().backend_mut().clear();
    p
}

fn entered() -> Portfolio<AudioLog> {
    let mut p = portfolio_with(AudioSettings::default());
    p.assets_loaded();
    p.enter();
    p.sounds_mut().backend_mut().clear();
    p
}

/// NDC of the world-space center of `name`.
fn ndc_of(p: &Portfolio<AudioLog>, name: &str) -> Vec2 {
    let id = p.scene.find(name).expect("node exists");
    let center = p.scene.world_matrix(id).transform_point3(Vec3::ZERO);
    let ndc = p.camera.project(center);
    Vec2::new(ndc.x, ndc.y)
}

fn click(p: &mut Portfolio<AudioLog>, name: &str) -> Vec<Effect> {
    let at = ndc_of(p, name);
    p.mouse_click(at)
}

fn plays(p: &Portfolio<AudioLog>) -> Vec<String> {
    p.sounds().backend().plays().into_iter().map(str::to_string).collect()
}

fn run(p: &mut Portfolio<AudioLog>, secs: f32) {
    let frames = (secs / 0.016).ceil() as usize;
    for _ in 0..frames {
        p.update(Duration::from_millis(16));
    }
}

#[test]
fn scene_clicks_wait_for_enter() {
    let mut p = portfolio_with(AudioSettings::default());
    assert!(click(&mut p, "PC").is_empty());
    p.assets_loaded();
    assert_eq!(p.state.lifecycle, Lifecycle::Ready);
    assert!(click(&mut p, "PC").is_empty());
    assert!(!p.state.is_modal_open());
    assert!(plays(&p).is_empty());
}

#[test]
fn enter_plays_ui_sound_then_starts_music() {
    let mut p = portfolio_with(AudioSettings::default());
    p.assets_loaded();
    p.handle_ui(&UiAction::Enter);
    assert_eq!(p.state.lifecycle, Lifecycle::Entered);
    assert_eq!(plays(&p), vec!["projectsSFX", "backgroundMusic"]);
    assert_eq!(p.sounds().music_state(), MusicState::Playing);
}

#[test]
fn link_objects_open_urls_silently() {
    let mut p = entered();
    let effects = click(&mut p, "Linkedin");
    let (_, url) = EXTERNAL_LINKS
        .iter()
        .find(|(name, _)| *name == "Linkedin")
        .expect("linkedin has a url");
    assert_eq!(effects, vec![Effect::OpenUrl(url.to_string())]);
    assert!(plays(&p).is_empty());
}

#[test]
fn open_modal_swallows_scene_clicks_until_closed() {
    let mut p = entered();
    click(&mut p, "PC");
    assert_eq!(p.state.modal.current(), Some("PC"));
    assert_eq!(plays(&p), vec!["projectsSFX"]);

    click(&mut p, "Basket");
    assert!(!p.state.animator.is_in_flight("Basket"));
    assert_eq!(plays(&p), vec!["projectsSFX"]);

    p.handle_ui(&UiAction::CloseModal);
    assert!(!p.state.is_modal_open());
    click(&mut p, "Basket");
    assert!(p.state.animator.is_in_flight("Basket"));
}

#[test]
fn visit_button_opens_the_modal_link() {
    let mut p = entered();
    click(&mut p, "PC");
    let effects = p.handle_ui(&UiAction::VisitLink);
    assert!(matches!(effects.as_slice(), [Effect::OpenUrl(url)] if url.contains("drive.google.com")));
}

#[test]
fn speaker_child_resolves_to_parent_and_toggles_mute() {
    let mut p = entered();
    click(&mut p, "Speaker_Box");
    assert!(p.is_muted());
    assert_eq!(
        p.sounds().backend().calls,
        vec![
            AudioCall::Play("projectsSFX".into()),
            AudioCall::Pause("backgroundMusic".into()),
        ]
    );

    p.sounds_mut().backend_mut().clear();
    click(&mut p, "Speaker_Box");
    assert!(!p.is_muted());
    // Muted at click time, so only the music comes back.
    assert_eq!(
        p.sounds().backend().calls,
        vec![AudioCall::Resume("backgroundMusic".into())]
    );
}

#[test]
fn muted_page_stays_silent() {
    let mut p = portfolio_with(AudioSettings {
        start_muted: true,
        ..AudioSettings::default()
    });
    p.assets_loaded();
    p.enter();
    click(&mut p, "Basket");
    click(&mut p, "Chair");
    assert!(plays(&p).is_empty());

    p.handle_ui(&UiAction::ToggleAudio);
    assert_eq!(plays(&p), vec!["backgroundMusic"]);
}

#[test]
fn muting_in_the_room_leaves_launch_settings_alone() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"audio":{"start_muted":false,"music_volume":1.0,"sfx_volume":1.0}}"#)
        .expect("write settings");
    let before = std::fs::read(&path).expect("read settings");

    let store = SettingsStore::new(&path);
    let mut p = portfolio_with(store.load().audio);
    p.assets_loaded();
    p.enter();
    click(&mut p, "Speaker_Box");
    assert!(p.is_muted());

    assert_eq!(std::fs::read(&path).expect("read settings"), before);
    assert!(!store.load().audio.start_muted);
}

#[test]
fn lamp_switches_theme_and_fades_lights() {
    let mut p = entered();
    click(&mut p, "Lamp");
    assert_eq!(p.state.theme, Theme::Dark);
    assert_eq!(p.scene.background, color_to_vec3(DARK_BACKGROUND));
    run(&mut p, 1.2);
    let target = Theme::Dark.lighting();
    assert!((p.scene.ambient.intensity - target.ambient_intensity).abs() < 1e-3);
    assert!((p.scene.sun.intensity - target.sun_intensity).abs() < 1e-3);
}

#[test]
fn bounce_is_guarded_until_it_lands() {
    let mut p = entered();
    let rest = p.scene.transform("Basket").map(|t| (t.position, t.scale)).expect("basket");
    click(&mut p, "Basket");
    run(&mut p, 0.1);
    click(&mut p, "Basket");
    assert_eq!(p.state.animator.active(), 1);
    // Sound plays for both clicks.
    assert_eq!(plays(&p), vec!["pokemonSFX", "pokemonSFX"]);

    run(&mut p, 1.5);
    assert!(!p.state.animator.is_in_flight("Basket"));
    let now = p.scene.transform("Basket").map(|t| (t.position, t.scale)).expect("basket");
    assert!(now.0.distance(rest.0) < 1e-3);
    assert!(now.1.distance(rest.1) < 1e-3);
}

#[test]
fn chair_clicks_play_sound_and_spin() {
    let mut p = entered();
    let rot = p.scene.transform("Chair").map(|t| t.rotation.y).expect("chair");
    click(&mut p, "Chair");
    assert_eq!(plays(&p), vec!["Chair"]);
    run(&mut p, 0.5);
    let mid = p.scene.transform("Chair").map(|t| t.rotation.y).expect("chair");
    assert!(mid > rot);
}

#[test]
fn click_right_after_touch_is_ignored() {
    let mut p = entered();
    let at = ndc_of(&p, "Basket");
    p.touch_end(at);
    assert_eq!(plays(&p), vec!["pokemonSFX"]);
    // The synthetic click a tap produces must not fire a second time.
    assert!(p.mouse_click(at).is_empty());
    assert_eq!(plays(&p), vec!["pokemonSFX"]);
}

#[test]
fn hover_emits_cursor_changes_only_on_transitions() {
    let mut p = entered();
    p.pointer_moved(ndc_of(&p, "PC"));
    assert_eq!(p.update(Duration::from_millis(16)), vec![Effect::SetPointerCursor(true)]);
    assert!(p.update(Duration::from_millis(16)).is_empty());
    p.pointer_moved(Vec2::new(0.99, 0.99));
    assert_eq!(p.update(Duration::from_millis(16)), vec![Effect::SetPointerCursor(false)]);
}

#[test]
fn held_key_hops_character_with_jump_sound() {
    let mut p = entered();
    let start = p.scene.transform("Character").map(|t| t.position).expect("character");
    p.key_pressed(portfolio::input::Direction::Up);
    p.update(Duration::from_millis(16));
    assert_eq!(plays(&p), vec!["jumpSFX"]);
    p.key_released(portfolio::input::Direction::Up);
    run(&mut p, 1.5);
    let end = p.scene.transform("Character").map(|t| t.position).expect("character");
    assert!(end.z > start.z + 1.0, "moved from {start:?} to {end:?}");
    assert!(end.y.abs() < 0.05);
}

#[test]
fn focus_loss_releases_held_directions() {
    let mut p = entered();
    p.key_pressed(portfolio::input::Direction::Left);
    p.handle_ui(&UiAction::MobileDirection(portfolio::input::Direction::Down));
    p.focus_lost();
    assert!(!p.state.input.any_held());
    assert!(p.state.mobile_held.is_none());
}

#[test]
fn resize_updates_camera_aspect() {
    let mut p = entered();
    p.resize(SurfaceSize::new(300, 100));
    assert!((p.camera.aspect - 3.0).abs() < 1e-6);
    p.resize(SurfaceSize::new(0, 100));
    assert!((p.camera.aspect - 3.0).abs() < 1e-6);
}

#[test]
fn shipped_scene_has_every_interactable_and_the_character() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/scene.json");
    let scene = SceneGraph::load(&path).expect("shipped scene loads");
    for name in INTERACTABLE {
        assert!(scene.find(name).is_some(), "scene is missing {name}");
    }
    assert!(scene.find("Character").is_some());
    assert!(!scene.collision_boxes().is_empty());
}

#[test]
fn missing_scene_file_yields_an_empty_room() {
    let scene = load_scene_or_empty(Path::new("does/not/exist.json"));
    assert!(scene.is_empty());
}
