//! Camera and frame sampling.
//!
//! The camera sits at a position with an axis-angle rotation and a vertical
//! field of view. Each output pixel is averaged from a fixed set of
//! sub-pixel sample offsets; the offsets are keyed by sample index, so a
//! render is deterministic: same scene, same image, regardless of
//! thread count.

use glam::{Mat3A, Vec3A};
use image::{ImageBuffer, Rgb};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

use crate::ray::Ray;
use crate::scene::Scene;

/// Linear-light output buffer: one f32 RGB triple per pixel.
pub type Frame = ImageBuffer<Rgb<f32>, Vec<f32>>;

/// Quincunx corner offsets cycled by sample index.
const SAMPLE_OFFSETS: [(f32, f32); 4] = [(-0.25, -0.25), (0.25, -0.25), (-0.25, 0.25), (0.25, 0.25)];

/// Pinhole camera and per-pixel sampling parameters.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Sub-pixel samples per output pixel.
    pub samples: u32,
    /// Camera position in world space.
    pub position: Vec3A,
    /// Axis the camera is rotated about. Zero means no rotation.
    pub rotation_axis: Vec3A,
    /// Rotation angle about the axis, in radians.
    pub rotation: f32,
    /// Vertical field of view, in radians.
    pub fov: f32,
}

impl Camera {
    /// Create a camera. Angles are taken in degrees, matching the
    /// configuration file, and converted once here.
    pub fn new(
        width: u32,
        height: u32,
        samples: u32,
        position: Vec3A,
        rotation_axis: Vec3A,
        rotation_degrees: f32,
        fov_degrees: f32,
    ) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            samples: samples.max(1),
            position,
            rotation_axis,
            rotation: rotation_degrees.to_radians(),
            fov: fov_degrees.to_radians(),
        }
    }

    /// Rotation matrix applied to every camera ray.
    pub fn rotation_matrix(&self) -> Mat3A {
        match self.rotation_axis.try_normalize() {
            Some(axis) => Mat3A::from_axis_angle(axis.into(), self.rotation),
            None => Mat3A::IDENTITY,
        }
    }

    /// Build the camera ray for one sub-pixel sample of pixel (x, y).
    ///
    /// The projection maps the pixel grid onto a plane one unit in front of
    /// the camera, scaled by the field of view and the aspect ratio, then
    /// rotates into world space.
    pub fn sample_ray(&self, rotation: &Mat3A, x: u32, y: u32, sample: u32) -> Ray {
        let (ox, oy) = if self.samples == 1 {
            (0.0, 0.0)
        } else {
            SAMPLE_OFFSETS[(sample as usize) % SAMPLE_OFFSETS.len()]
        };
        let sx = x as f32 + 0.5 + ox;
        let sy = y as f32 + 0.5 + oy;

        let w = self.width as f32;
        let h = self.height as f32;
        let half_fov = (self.fov / 2.0).tan();

        let i = (2.0 * sx / w - 1.0) * half_fov * w / h;
        let j = -(2.0 * sy / h - 1.0) * half_fov;

        let direction = *rotation * Vec3A::new(i, j, -1.0).normalize();
        Ray::new(self.position, direction)
    }

    /// Render the scene into a linear-light frame.
    ///
    /// The pixel loop is embarrassingly parallel: every worker reads the
    /// same immutable scene and writes exactly one output cell, so no
    /// synchronization is needed beyond the final join. Wall time is
    /// measured once around the whole parallel phase.
    pub fn render(&self, scene: &Scene) -> Frame {
        let rotation = self.rotation_matrix();
        let mut frame: Frame = ImageBuffer::new(self.width, self.height);

        info!(
            "Rendering {}x{} at {} samples/pixel on {} threads...",
            self.width,
            self.height,
            self.samples,
            rayon::current_num_threads()
        );
        let render_start = std::time::Instant::now();
        let pb = ProgressBar::new((self.width * self.height) as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40} {pos}/{len} ETA: {eta}")
                .unwrap(),
        );

        frame.enumerate_pixels_mut().par_bridge().for_each(|(x, y, pixel)| {
            let mut accumulated = Vec3A::ZERO;
            for sample in 0..self.samples {
                let ray = self.sample_ray(&rotation, x, y, sample);
                accumulated += scene.shade(&ray, 0);
            }
            accumulated /= self.samples as f32;

            *pixel = Rgb([accumulated.x, accumulated.y, accumulated.z]);
            pb.inc(1);
        });

        pb.finish();
        info!("Render finished in {:.2?}", render_start.elapsed());
        frame
    }
}
