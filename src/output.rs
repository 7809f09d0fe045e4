//! Image output: PNG for 8-bit results, EXR for the linear frame.
//!
//! PNG conversion is a straight round-and-clamp from linear to 8 bits, the
//! same mapping the quantizer applies, so a palettized render and a plain
//! one see identical source values. EXR keeps the full-precision linear
//! data for external tone mapping.

use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb, RgbImage};
use log::info;

use crate::camera::Frame;
use crate::error::RenderError;
use crate::palette::TrueColor;

/// Save the linear frame as an 8-bit PNG.
pub fn save_png(frame: &Frame, path: impl AsRef<Path>) -> Result<(), RenderError> {
    let path = path.as_ref();
    let bytes: RgbImage = ImageBuffer::from_fn(frame.width(), frame.height(), |x, y| {
        let p = frame.get_pixel(x, y);
        let c = TrueColor::from_linear(glam::Vec3A::new(p[0], p[1], p[2]));
        Rgb([c.r, c.g, c.b])
    });

    bytes.save(path).map_err(|source| RenderError::Image {
        path: PathBuf::from(path),
        source,
    })?;
    info!("Image saved as {}", path.display());
    Ok(())
}

/// Save an already-quantized 8-bit image.
pub fn save_quantized(image: &RgbImage, path: impl AsRef<Path>) -> Result<(), RenderError> {
    let path = path.as_ref();
    image.save(path).map_err(|source| RenderError::Image {
        path: PathBuf::from(path),
        source,
    })?;
    info!("Palettized image saved as {}", path.display());
    Ok(())
}

/// Save the linear frame as a full-precision EXR.
pub fn save_exr(frame: &Frame, path: impl AsRef<Path>) -> Result<(), RenderError> {
    let path = path.as_ref();
    let width = frame.width() as usize;
    let height = frame.height() as usize;

    exr::prelude::write_rgb_file(path, width, height, |x, y| {
        let p = frame.get_pixel(x as u32, y as u32);
        (p[0], p[1], p[2])
    })
    .map_err(|source| RenderError::Io {
        path: PathBuf::from(path),
        source: std::io::Error::other(source),
    })?;
    info!("HDR image saved as EXR: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_conversion_rounds_and_clamps() {
        let mut frame = Frame::new(2, 1);
        frame.put_pixel(0, 0, Rgb([0.5, 1.5, -0.2]));
        frame.put_pixel(1, 0, Rgb([0.0, 1.0, 0.25]));

        let dir = std::env::temp_dir().join("ditherpath_png_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.png");
        save_png(&frame, &path).unwrap();

        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.get_pixel(0, 0).0, [128, 255, 0]);
        assert_eq!(back.get_pixel(1, 0).0, [0, 255, 64]);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let frame = Frame::new(1, 1);
        assert!(save_png(&frame, "no/such/dir/out.png").is_err());
    }
}
