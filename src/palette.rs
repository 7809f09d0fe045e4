//! Palette colors, perceptual distance, and the mixing-plan search.
//!
//! This implements the Knoll–Yliluoma style color planner: for a target
//! color it searches the first sixteen palette entries for the best
//! two-color blend or four-phase three-color pattern, scored by a cheap
//! luma-weighted distance. The ratio is kept in 64ths so the ordered-dither
//! threshold matrix can compare against it exactly.

use std::path::{Path, PathBuf};

use glam::Vec3A;

use crate::error::RenderError;

/// Minimum number of palette entries the mixing-plan search requires.
pub const MIN_MIXING_COLORS: usize = 16;

/// Per-channel luma weights (broadcast coefficients, summing to 1000).
const LUMA_WEIGHTS: (u32, u32, u32) = (299, 587, 114);

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrueColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl TrueColor {
    /// Create a color from 8-bit channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Round-and-clamp a linear [0, 1] color to 8 bits per channel.
    pub fn from_linear(c: Vec3A) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(q(c.x), q(c.y), q(c.z))
    }

    /// Weighted brightness: 299 R + 587 G + 114 B, in [0, 255 * 1000].
    pub fn luma(&self) -> u32 {
        self.r as u32 * LUMA_WEIGHTS.0 + self.g as u32 * LUMA_WEIGHTS.1 + self.b as u32 * LUMA_WEIGHTS.2
    }

    /// Luma-weighted perceptual distance to another color.
    ///
    /// Channel deltas are normalized to [0, 1], weighted by the luma
    /// coefficients and scaled by 0.75, then the squared normalized luma
    /// delta is added. Symmetric, zero iff the colors are equal. Cheap
    /// enough to run in an O(16³) search without a color-space conversion.
    pub fn dist(&self, other: &TrueColor) -> f64 {
        let luma_a = self.luma() as f64 / (255.0 * 1000.0);
        let luma_b = other.luma() as f64 / (255.0 * 1000.0);
        let dl = luma_a - luma_b;

        let dr = (self.r as f64 - other.r as f64) / 255.0;
        let dg = (self.g as f64 - other.g as f64) / 255.0;
        let db = (self.b as f64 - other.b as f64) / 255.0;

        (dr * dr * 0.299 + dg * dg * 0.587 + db * db * 0.114) * 0.75 + dl * dl
    }
}

/// The chosen approximation for one source pixel.
///
/// Computed fresh per pixel and consumed immediately by the dither
/// compositor; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixPlan {
    /// Two palette colors blended at `ratio`/64 of `b` over `a`.
    PairBlend {
        /// Blend endpoint shown below the threshold.
        a: TrueColor,
        /// Blend endpoint shown at or above the threshold.
        b: TrueColor,
        /// Blend ratio in 64ths, 0..=63.
        ratio: u8,
    },
    /// Four phase colors arranged in a fixed 2x2 spatial pattern.
    TripleDither {
        /// Phase colors selected by pixel parity.
        phases: [TrueColor; 4],
    },
}

/// An ordered set of reference colors.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: Vec<TrueColor>,
}

impl Palette {
    /// Build a palette from colors in order.
    pub fn new(colors: Vec<TrueColor>) -> Self {
        Self { colors }
    }

    /// Load a palette file, choosing the format by extension: `.pal` is
    /// 6-bit binary, anything else is decimal text.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        if path.extension().is_some_and(|e| e == "pal") {
            Self::from_binary(path)
        } else {
            Self::from_text(path)
        }
    }

    /// Parse whitespace-separated decimal `r g b` triples. Lines starting
    /// with `#` are comments.
    pub fn from_text(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: PathBuf::from(path),
            source,
        })?;

        let values: Vec<u32> = body
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .flat_map(str::split_whitespace)
            .filter_map(|token| token.parse().ok())
            .collect();

        let colors = values
            .chunks_exact(3)
            .map(|c| {
                TrueColor::new(
                    c[0].min(255) as u8,
                    c[1].min(255) as u8,
                    c[2].min(255) as u8,
                )
            })
            .collect();
        Ok(Self { colors })
    }

    /// Read raw 6-bit VGA triples, scaling each channel by 4.
    pub fn from_binary(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| RenderError::Io {
            path: PathBuf::from(path),
            source,
        })?;

        let colors = bytes
            .chunks_exact(3)
            .map(|c| {
                TrueColor::new(
                    c[0].saturating_mul(4),
                    c[1].saturating_mul(4),
                    c[2].saturating_mul(4),
                )
            })
            .collect();
        Ok(Self { colors })
    }

    /// Number of colors in the palette.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The palette colors in order.
    pub fn colors(&self) -> &[TrueColor] {
        &self.colors
    }

    /// Check that the mixing-plan search has enough entries to run.
    pub fn ensure_mixable(&self) -> Result<(), RenderError> {
        if self.colors.len() < MIN_MIXING_COLORS {
            return Err(RenderError::PaletteTooSmall {
                found: self.colors.len(),
            });
        }
        Ok(())
    }

    /// Nearest palette color to `target` by perceptual distance.
    ///
    /// Considers every entry, not just the first sixteen, so it works with
    /// palettes too small (or too large) for the mixing search. Returns
    /// `None` for an empty palette.
    pub fn nearest(&self, target: TrueColor) -> Option<TrueColor> {
        let mut nearest: Option<(f64, TrueColor)> = None;
        for &color in &self.colors {
            let dist = target.dist(&color);
            if nearest.map_or(true, |(best, _)| dist < best) {
                nearest = Some((dist, color));
            }
        }
        nearest.map(|(_, color)| color)
    }

    /// Search the first sixteen entries for the best mixing plan.
    ///
    /// Every unordered pair is scored as a blend, and every pair-plus-third
    /// combination as a four-phase pattern; the single lowest score wins,
    /// earliest candidate on ties. Sixteen is a fixed hardware-palette-style
    /// budget, so the exhaustive O(16³) search has constant cost.
    ///
    /// # Panics
    ///
    /// Panics if the palette has fewer than [`MIN_MIXING_COLORS`] entries;
    /// call [`Palette::ensure_mixable`] first.
    pub fn devise_plan(&self, target: TrueColor) -> MixPlan {
        assert!(
            self.colors.len() >= MIN_MIXING_COLORS,
            "mixing-plan search needs at least {MIN_MIXING_COLORS} palette colors"
        );

        let mut best_penalty = f64::INFINITY;
        let mut best_plan = MixPlan::PairBlend {
            a: self.colors[0],
            b: self.colors[0],
            ratio: 0,
        };

        for i in 0..MIN_MIXING_COLORS {
            for j in i..MIN_MIXING_COLORS {
                let a = self.colors[i];
                let b = self.colors[j];

                let ratio = mix_ratio(target, a, b);
                let blend = blend(a, b, ratio);
                let penalty = target.dist(&blend)
                    + a.dist(&b) * 0.1 * ((ratio as f64 / 64.0 - 0.5).abs() + 0.5);
                if penalty < best_penalty {
                    best_penalty = penalty;
                    best_plan = MixPlan::PairBlend {
                        a,
                        b,
                        ratio: ratio as u8,
                    };
                }

                if i == j {
                    continue;
                }
                for k in 0..MIN_MIXING_COLORS {
                    if k == i || k == j {
                        continue;
                    }
                    let c = self.colors[k];

                    // Third color at double weight: it fills two of the four
                    // phases.
                    let tri = triple_average(a, b, c);
                    let penalty = target.dist(&tri)
                        + a.dist(&b) * 0.025
                        + tritone(a, b).dist(&c) * 0.025;
                    if penalty < best_penalty {
                        best_penalty = penalty;
                        best_plan = MixPlan::TripleDither {
                            phases: [c, a, b, c],
                        };
                    }
                }
            }
        }

        best_plan
    }
}

/// Integer blend ratio of `target` between `a` and `b`, in 64ths.
///
/// Each differing channel projects the target onto the a-b segment; the
/// projections are combined weighted by the luma coefficients. Equal colors
/// degenerate to ratio 0, no mixing needed.
fn mix_ratio(target: TrueColor, a: TrueColor, b: TrueColor) -> i32 {
    if a == b {
        return 0;
    }

    let (wr, wg, wb) = LUMA_WEIGHTS;
    let mut sum: i32 = 0;
    let mut weight: i32 = 0;
    if a.r != b.r {
        sum += wr as i32 * 64 * (target.r as i32 - a.r as i32) / (b.r as i32 - a.r as i32);
        weight += wr as i32;
    }
    if a.g != b.g {
        sum += wg as i32 * 64 * (target.g as i32 - a.g as i32) / (b.g as i32 - a.g as i32);
        weight += wg as i32;
    }
    if a.b != b.b {
        sum += wb as i32 * 64 * (target.b as i32 - a.b as i32) / (b.b as i32 - a.b as i32);
        weight += wb as i32;
    }

    (sum / weight).clamp(0, 63)
}

/// Per-channel interpolation of `b` over `a` at `ratio`/64.
fn blend(a: TrueColor, b: TrueColor, ratio: i32) -> TrueColor {
    let mix = |a: u8, b: u8| (a as i32 + ratio * (b as i32 - a as i32) / 64) as u8;
    TrueColor::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

/// Average of the two anchors with the third at double weight.
fn triple_average(a: TrueColor, b: TrueColor, c: TrueColor) -> TrueColor {
    let avg = |a: u8, b: u8, c: u8| ((a as u16 + b as u16 + 2 * c as u16) / 4) as u8;
    TrueColor::new(avg(a.r, b.r, c.r), avg(a.g, b.g, c.g), avg(a.b, b.b, c.b))
}

/// Per-channel midpoint of the two anchor colors.
fn tritone(a: TrueColor, b: TrueColor) -> TrueColor {
    let mid = |a: u8, b: u8| ((a as u16 + b as u16) / 2) as u8;
    TrueColor::new(mid(a.r, b.r), mid(a.g, b.g), mid(a.b, b.b))
}
