//! Command-line arguments.

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels accepted on the command line.
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Normal progress output.
    Info,
    /// Debugging detail.
    Debug,
    /// Everything.
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros.
#[derive(Parser)]
#[command(name = "ditherpath")]
#[command(about = "A ray tracer that dithers like it's the 90s")]
pub struct Args {
    /// Configuration file; built-in defaults apply when the default path is
    /// absent.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Set the logging level.
    #[arg(long, default_value = "info")]
    pub debug_level: LogLevel,

    /// Override the configured image width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Override the configured image height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Override the configured samples per pixel.
    #[arg(short, long)]
    pub samples: Option<u32>,

    /// Override the configured output file.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the configured scene seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the palettized output stage even when configured.
    #[arg(long)]
    pub no_palette: bool,
}
