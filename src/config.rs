//! Run configuration loaded from a TOML file.
//!
//! Sections mirror the renderer's concerns: `[output]`, `[render]`,
//! `[camera]`, an optional `[palette]`, and `[scene]` parameters for the
//! built-in scene generator. Every field has a default, so a partial file
//! (or none at all) still renders.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::RenderError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output file settings.
    pub output: OutputConfig,
    /// Raster dimensions and sampling.
    pub render: RenderConfig,
    /// Camera placement and projection.
    pub camera: CameraConfig,
    /// Palettized output; `None` disables the quantization stage.
    pub palette: Option<PaletteConfig>,
    /// Scene generator parameters.
    pub scene: SceneConfig,
}

impl Config {
    /// Load and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        Ok(toml::from_str(&body)?)
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file name; the extension selects the codec (png or exr).
    pub name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            name: "render.png".to_string(),
        }
    }
}

/// `[render]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Sub-pixel samples per pixel.
    pub samples: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            samples: 4,
        }
    }
}

/// `[camera]` section. Angles are in degrees.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position.
    pub position: [f32; 3],
    /// Axis of the camera rotation; zero means unrotated.
    pub rotation_axis: [f32; 3],
    /// Rotation angle about the axis, degrees.
    pub rotation_degrees: f32,
    /// Vertical field of view, degrees.
    pub fov_degrees: f32,
    /// Background color, linear RGB in [0, 1].
    pub background: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 2.0, 8.0],
            rotation_axis: [0.0, 0.0, 0.0],
            rotation_degrees: 0.0,
            fov_degrees: 90.0,
            background: [0.0, 0.0, 0.0],
        }
    }
}

/// `[palette]` section. Present means the quantization stage runs.
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteConfig {
    /// Path of the palette file.
    pub path: String,
    /// Ordered dithering when true, plain nearest-match when false.
    #[serde(default = "default_dither")]
    pub dither: bool,
}

fn default_dither() -> bool {
    true
}

/// `[scene]` section: parameters for the built-in generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for the scene RNG; renders are reproducible per seed.
    pub seed: u64,
    /// Number of random spheres scattered on the floor.
    pub sphere_count: usize,
    /// Image file for the floor texture; a checkerboard when absent.
    pub floor_texture: Option<String>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            sphere_count: 50,
            floor_texture: None,
        }
    }
}
