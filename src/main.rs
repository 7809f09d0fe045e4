use anyhow::Context;
use clap::Parser;
use log::info;

use ditherpath::camera::Camera;
use ditherpath::config::Config;
use ditherpath::dither::{self, QuantizeMode};
use ditherpath::output;
use ditherpath::palette::Palette;
use ditherpath::scenes;

mod cli;

use cli::Args;

const DEFAULT_CONFIG: &str = "config.toml";

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.debug_level.clone().into())
        .init();

    info!("ditherpath {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    // An explicitly named configuration file must exist; the default path is
    // optional and falls back to built-in settings.
    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {path}"))?,
        None if std::path::Path::new(DEFAULT_CONFIG).exists() => Config::load(DEFAULT_CONFIG)?,
        None => {
            info!("No {DEFAULT_CONFIG} found, using defaults");
            Config::default()
        }
    };

    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(samples) = args.samples {
        config.render.samples = samples;
    }
    if let Some(output) = args.output {
        config.output.name = output;
    }
    if let Some(seed) = args.seed {
        config.scene.seed = seed;
    }

    // Load and validate the palette before spending any time rendering.
    let palette = match (&config.palette, args.no_palette) {
        (Some(settings), false) => {
            let palette = Palette::from_path(&settings.path)
                .with_context(|| format!("loading palette {}", settings.path))?;
            let mode = if settings.dither {
                palette.ensure_mixable()?;
                QuantizeMode::Ordered
            } else {
                QuantizeMode::Nearest
            };
            info!("Palette loaded: {} colors from {}", palette.len(), settings.path);
            Some((palette, mode))
        }
        _ => None,
    };

    let scene = scenes::demo_scene(&config).context("building scene")?;
    info!(
        "Scene ready: {} objects, {} lights (seed {})",
        scene.objects.len(),
        scene.lights.len(),
        config.scene.seed
    );

    let camera = Camera::new(
        config.render.width,
        config.render.height,
        config.render.samples,
        config.camera.position.into(),
        config.camera.rotation_axis.into(),
        config.camera.rotation_degrees,
        config.camera.fov_degrees,
    );

    let frame = camera.render(&scene);

    let name = &config.output.name;
    match palette {
        Some((palette, mode)) => {
            let quantized = dither::quantize(&frame, &palette, mode)?;
            output::save_quantized(&quantized, name)?;
        }
        None if name.ends_with(".exr") => output::save_exr(&frame, name)?,
        None => output::save_png(&frame, name)?,
    }

    Ok(())
}
