use std::path::PathBuf;

use anyhow::Context;
use fluid_engine::logging::{LoggingConfig, init_logging};
use fluid_glass::config::{CONFIG_ENV, resolve_config_path};
use fluid_glass::{GlassApp, GlassConfig, NavTarget};

/// Directory with `cs1.webp` … `cs5.webp`, overridable from the environment.
const ASSETS_ENV: &str = "FLUID_GLASS_ASSETS";

const WIDTH: f32 = 1280.0;
const HEIGHT: f32 = 800.0;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = match resolve_config_path(std::env::args().nth(1), std::env::var(CONFIG_ENV).ok()) {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            GlassConfig::from_path(&path).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => GlassConfig::showcase(WIDTH),
    };

    let assets = std::env::var(ASSETS_ENV).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("assets/demo"));

    log::info!("keys: 1 lens · 2 bar · 3 cube · R reset · E extreme · Esc quit");

    GlassApp::new()
        .title("Fluid Glass")
        .size(WIDTH as f64, HEIGHT as f64)
        .font("body", load_font())
        .config(config)
        .image_dir(assets)
        .on_navigate(|target| match target {
            NavTarget::Anchor(anchor) => log::info!("jump to {anchor}"),
            NavTarget::Href(href) => log::info!("open {href}"),
        })
        .run()
}

fn load_font() -> Vec<u8> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
    .unwrap_or_default()
}
