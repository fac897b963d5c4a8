use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use engine::app::{AppConfig, run_game};
use portfolio::headful::app::{LaunchOptions, PortfolioApp};
use portfolio::picking::PickPolicy;
use portfolio::settings::SettingsStore;
use winit::dpi::PhysicalSize;

#[derive(Parser, Debug)]
#[command(about = "Interactive 3D portfolio room", version)]
struct Args {
    /// Scene description JSON
    #[arg(long, default_value = "portfolio/assets/scene.json")]
    scene: PathBuf,

    /// Directory holding `sfx/` and `media/`
    #[arg(long, default_value = "portfolio/assets")]
    assets: PathBuf,

    /// Start with audio muted (overrides the settings file)
    #[arg(long)]
    muted: bool,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Let clicks pass through unlabeled meshes to the nearest interactable one
    #[arg(long)]
    look_through: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    ensure!(
        args.width > 0 && args.height > 0,
        "window size must be non-zero (got {}x{})",
        args.width,
        args.height
    );

    let store = SettingsStore::from_env();
    let mut settings = store.load();
    if args.muted {
        settings.audio.start_muted = true;
    }
    log::info!("settings from {}", store.path().display());

    let config = AppConfig {
        title: "Portfolio".to_string(),
        desired_size: PhysicalSize::new(args.width, args.height),
        clamp_to_monitor: true,
        vsync: Some(settings.video.vsync),
        render_scale: settings.video.render_scale,
    };
    let app = PortfolioApp::new(LaunchOptions {
        scene_path: args.scene,
        assets_dir: args.assets,
        settings,
        pick_policy: if args.look_through {
            PickPolicy::FirstInteractable
        } else {
            PickPolicy::NearestOnly
        },
    });
    run_game(config, app).context("running the portfolio window")
}
