//! Error types for scene setup and quantization.
//!
//! Everything here fails fast: each variant surfaces during configuration
//! or resource loading, before the first ray is cast.

use std::path::PathBuf;

use thiserror::Error;

use crate::palette::MIN_MIXING_COLORS;

/// Errors that can occur while preparing or quantizing a render.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The palette is too small for the mixing-plan search.
    #[error("palette has {found} colors; mixing needs at least {MIN_MIXING_COLORS}")]
    PaletteTooSmall {
        /// Number of colors actually supplied.
        found: usize,
    },

    /// Nearest-match quantization was asked to run with no colors at all.
    #[error("palette contains no colors")]
    EmptyPalette,

    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An image file could not be decoded.
    #[error("failed to decode image {path}: {source}")]
    Image {
        /// Path of the bad image.
        path: PathBuf,
        /// Underlying decode error.
        source: image::ImageError,
    },

    /// The configuration file did not parse.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
