//! ditherpath: a Whitted-style ray tracer with an optional palettized,
//! ordered-dithered output stage.
//!
//! A scene of spheres, planes, disks and triangles is shaded recursively
//! with hard shadows and mirror reflections, sampled into a linear frame,
//! and optionally re-expressed with a small fixed palette via perceptual
//! color matching and an 8x8 threshold matrix.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod camera;
pub mod config;
pub mod dither;
pub mod error;
pub mod hittable;
pub mod light;
pub mod material;
pub mod output;
pub mod palette;
pub mod ray;
pub mod scene;
pub mod scenes;
pub mod shapes;
pub mod texture;
