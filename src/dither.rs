//! Ordered dithering: turning a mixing plan and a pixel position into one
//! concrete palette color.
//!
//! Pair blends consult an 8x8 threshold matrix holding a permutation of
//! 0..=63: over any aligned 8x8 tile the number of cells that resolve to
//! the second color equals the blend ratio exactly, so the tile's spatial
//! average is the intended blend. Triple plans rotate through a fixed 2x2
//! phase pattern instead.

use image::{Rgb, RgbImage};
use rayon::prelude::*;

use crate::camera::Frame;
use crate::error::RenderError;
use crate::palette::{MixPlan, Palette, TrueColor};

/// Threshold matrix in 64ths, indexed `[x % 8][y % 8]`. A Bayer-style
/// permutation of 0..=63 covering the unit interval roughly uniformly.
pub const THRESHOLD_MATRIX: [[u8; 8]; 8] = [
    [0, 48, 12, 60, 3, 51, 15, 63],
    [32, 16, 44, 28, 35, 19, 47, 31],
    [8, 56, 4, 52, 11, 59, 7, 55],
    [40, 24, 36, 20, 43, 27, 39, 23],
    [2, 50, 14, 62, 1, 49, 13, 61],
    [34, 18, 46, 30, 33, 17, 45, 29],
    [10, 58, 6, 54, 9, 57, 5, 53],
    [42, 26, 38, 22, 41, 25, 37, 21],
];

/// How the quantizer maps source colors onto the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantizeMode {
    /// Nearest palette entry per pixel, no dithering.
    Nearest,
    /// Mixing-plan search plus ordered dithering.
    Ordered,
}

/// Resolve a mixing plan at pixel (x, y).
pub fn composite(plan: &MixPlan, x: u32, y: u32) -> TrueColor {
    match plan {
        MixPlan::TripleDither { phases } => phases[((y & 1) * 2 + (x & 1)) as usize],
        MixPlan::PairBlend { a, b, ratio } => {
            let threshold = THRESHOLD_MATRIX[(x % 8) as usize][(y % 8) as usize];
            if threshold < *ratio {
                *b
            } else {
                *a
            }
        }
    }
}

/// Re-express a rendered frame using the palette.
///
/// Each linear source pixel is rounded to 8 bits, planned against the
/// palette, and composited at its own coordinates. Refuses to run, before
/// touching any pixel, when the palette is too small for the requested
/// mode.
pub fn quantize(frame: &Frame, palette: &Palette, mode: QuantizeMode) -> Result<RgbImage, RenderError> {
    match mode {
        QuantizeMode::Ordered => palette.ensure_mixable()?,
        QuantizeMode::Nearest => {
            if palette.is_empty() {
                return Err(RenderError::EmptyPalette);
            }
        }
    }

    let mut out = RgbImage::new(frame.width(), frame.height());
    out.enumerate_pixels_mut().par_bridge().for_each(|(x, y, pixel)| {
        let src = frame.get_pixel(x, y);
        let target = TrueColor::from_linear(glam::Vec3A::new(src[0], src[1], src[2]));

        let chosen = match mode {
            QuantizeMode::Nearest => palette.nearest(target).expect("palette checked non-empty"),
            QuantizeMode::Ordered => composite(&palette.devise_plan(target), x, y),
        };
        *pixel = Rgb([chosen.r, chosen.g, chosen.b]);
    });

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_matrix_is_a_permutation() {
        let mut seen = [false; 64];
        for row in THRESHOLD_MATRIX {
            for v in row {
                assert!(!seen[v as usize]);
                seen[v as usize] = true;
            }
        }
    }

    #[test]
    fn pair_blend_tile_fraction_is_exact() {
        let a = TrueColor::new(0, 0, 0);
        let b = TrueColor::new(255, 255, 255);

        // A permutation of 0..=63 means exactly `ratio` thresholds lie
        // below the ratio, deterministically.
        for ratio in [0u8, 1, 17, 32, 63] {
            let plan = MixPlan::PairBlend { a, b, ratio };
            let b_cells = (0..8)
                .flat_map(|x| (0..8).map(move |y| (x, y)))
                .filter(|&(x, y)| composite(&plan, x, y) == b)
                .count();
            assert_eq!(b_cells, ratio as usize);
        }
    }

    #[test]
    fn pair_blend_is_tile_periodic() {
        let plan = MixPlan::PairBlend {
            a: TrueColor::new(10, 10, 10),
            b: TrueColor::new(200, 200, 200),
            ratio: 21,
        };
        for x in 0..8 {
            for y in 0..8 {
                assert_eq!(composite(&plan, x, y), composite(&plan, x + 8, y + 16));
            }
        }
    }

    #[test]
    fn triple_dither_rotates_the_2x2_pattern() {
        let phases = [
            TrueColor::new(1, 0, 0),
            TrueColor::new(2, 0, 0),
            TrueColor::new(3, 0, 0),
            TrueColor::new(4, 0, 0),
        ];
        let plan = MixPlan::TripleDither { phases };

        assert_eq!(composite(&plan, 0, 0), phases[0]);
        assert_eq!(composite(&plan, 1, 0), phases[1]);
        assert_eq!(composite(&plan, 0, 1), phases[2]);
        assert_eq!(composite(&plan, 1, 1), phases[3]);
        // Period two in both directions.
        assert_eq!(composite(&plan, 2, 2), phases[0]);
    }

    #[test]
    fn quantize_requires_a_mixable_palette() {
        let frame = Frame::new(4, 4);
        let palette = Palette::new(vec![TrueColor::new(0, 0, 0); 3]);

        let err = quantize(&frame, &palette, QuantizeMode::Ordered).unwrap_err();
        assert!(matches!(err, RenderError::PaletteTooSmall { found: 3 }));

        // The same palette is fine for nearest-match mode.
        assert!(quantize(&frame, &palette, QuantizeMode::Nearest).is_ok());

        let err = quantize(&frame, &Palette::default(), QuantizeMode::Nearest).unwrap_err();
        assert!(matches!(err, RenderError::EmptyPalette));
    }

    #[test]
    fn quantize_nearest_maps_every_pixel_into_the_palette() {
        let mut frame = Frame::new(2, 2);
        frame.put_pixel(0, 0, image::Rgb([0.1, 0.1, 0.1]));
        frame.put_pixel(1, 0, image::Rgb([0.9, 0.9, 0.9]));
        frame.put_pixel(0, 1, image::Rgb([0.4, 0.4, 0.4]));
        frame.put_pixel(1, 1, image::Rgb([1.0, 0.0, 0.0]));

        let palette = Palette::new(vec![
            TrueColor::new(0, 0, 0),
            TrueColor::new(255, 255, 255),
            TrueColor::new(255, 0, 0),
        ]);
        let out = quantize(&frame, &palette, QuantizeMode::Nearest).unwrap();

        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(out.get_pixel(1, 0).0, [255, 255, 255]);
        assert_eq!(out.get_pixel(1, 1).0, [255, 0, 0]);
    }

    #[test]
    fn quantize_ordered_uses_only_palette_colors() {
        let mut frame = Frame::new(8, 8);
        for (_, _, p) in frame.enumerate_pixels_mut() {
            *p = image::Rgb([0.5, 0.5, 0.5]);
        }

        let colors: Vec<TrueColor> = (0..16)
            .map(|i| {
                if i % 2 == 0 {
                    TrueColor::new(0, 0, 0)
                } else {
                    TrueColor::new(255, 255, 255)
                }
            })
            .collect();
        let palette = Palette::new(colors);

        let out = quantize(&frame, &palette, QuantizeMode::Ordered).unwrap();
        let mut blacks = 0;
        let mut whites = 0;
        for p in out.pixels() {
            match p.0 {
                [0, 0, 0] => blacks += 1,
                [255, 255, 255] => whites += 1,
                other => panic!("non-palette color {other:?} in output"),
            }
        }
        // A flat mid-gray field dithers to equal parts black and white.
        assert_eq!(blacks, 32);
        assert_eq!(whites, 32);
    }
}
