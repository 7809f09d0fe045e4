//! Texture variants: solid color, checkerboard, Perlin turbulence, and
//! image-sampled.
//!
//! A texture is a pure function of (u, v, world point) to a linear RGB color
//! in [0, 1]³. Image decoding happens once at construction (fail fast on a
//! bad path); sampling never touches the filesystem.

use std::path::{Path, PathBuf};

use glam::Vec3A;
use image::RgbImage;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::RenderError;

/// Index of a texture in the scene pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureId(pub usize);

/// The closed set of texture kinds.
#[derive(Debug, Clone)]
pub enum Texture {
    /// A single color everywhere.
    Solid {
        /// The color, linear RGB in [0, 1].
        color: Vec3A,
    },
    /// Two colors alternating on a UV checkerboard.
    Checker {
        /// Color of even cells.
        primary: Vec3A,
        /// Color of odd cells.
        secondary: Vec3A,
        /// Number of cells per UV unit.
        scale: f32,
    },
    /// Grayscale gradient-noise turbulence over world position.
    Perlin {
        /// Shuffled gradient permutation table.
        noise: PerlinNoise,
        /// Frequency multiplier per octave.
        lacunarity: f32,
        /// Amplitude multiplier per octave.
        gain: f32,
        /// Number of octaves summed.
        octaves: u32,
    },
    /// A decoded image sampled by (u, v) with wrap-around.
    Image {
        /// Decoded 8-bit RGB pixel buffer.
        image: RgbImage,
    },
}

impl Texture {
    /// A solid color texture.
    pub fn solid(color: Vec3A) -> Self {
        Self::Solid { color }
    }

    /// A UV checkerboard with `scale` cells per unit.
    pub fn checker(primary: Vec3A, secondary: Vec3A, scale: f32) -> Self {
        Self::Checker {
            primary,
            secondary,
            scale,
        }
    }

    /// A Perlin-turbulence texture with a table shuffled from `rng`.
    pub fn perlin(lacunarity: f32, gain: f32, octaves: u32, rng: &mut impl Rng) -> Self {
        Self::Perlin {
            noise: PerlinNoise::new(rng),
            lacunarity,
            gain,
            octaves,
        }
    }

    /// An image texture from an already-decoded buffer.
    pub fn image(image: RgbImage) -> Self {
        Self::Image { image }
    }

    /// Decode an image file into a texture.
    ///
    /// Fails before any rendering begins when the file is missing or not a
    /// decodable image.
    pub fn image_from_path(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| RenderError::Image {
            path: PathBuf::from(path),
            source,
        })?;
        Ok(Self::Image {
            image: decoded.to_rgb8(),
        })
    }

    /// Evaluate the texture at (u, v) and world-space `point`.
    pub fn sample(&self, u: f32, v: f32, point: Vec3A) -> Vec3A {
        match self {
            Self::Solid { color } => *color,
            Self::Checker {
                primary,
                secondary,
                scale,
            } => {
                let cell = (u * scale).floor() + (v * scale).floor();
                if cell.rem_euclid(2.0) < 1.0 {
                    *primary
                } else {
                    *secondary
                }
            }
            Self::Perlin {
                noise,
                lacunarity,
                gain,
                octaves,
            } => {
                let t = noise
                    .turbulence(point, *lacunarity, *gain, *octaves)
                    .clamp(0.0, 1.0);
                Vec3A::splat(t)
            }
            Self::Image { image } => {
                let (w, h) = image.dimensions();
                let x = ((u.rem_euclid(1.0) * w as f32) as u32).min(w - 1);
                let y = (((1.0 - v.rem_euclid(1.0)) * h as f32) as u32).min(h - 1);
                let p = image.get_pixel(x, y);
                Vec3A::new(
                    p[0] as f32 / 255.0,
                    p[1] as f32 / 255.0,
                    p[2] as f32 / 255.0,
                )
            }
        }
    }
}

/// Classic permutation-table gradient noise.
///
/// The table is shuffled from the caller's RNG, so two textures built from
/// the same seed produce identical patterns.
#[derive(Clone)]
pub struct PerlinNoise {
    perm: [u8; 512],
}

impl std::fmt::Debug for PerlinNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerlinNoise").finish_non_exhaustive()
    }
}

impl PerlinNoise {
    /// Build a noise field with a freshly shuffled permutation table.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut base: [u8; 256] = std::array::from_fn(|i| i as u8);
        base.shuffle(rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = base[i & 255];
        }
        Self { perm }
    }

    /// Single-octave gradient noise in roughly [-1, 1].
    pub fn noise(&self, p: Vec3A) -> f32 {
        let xi = (p.x.floor() as i32 & 255) as usize;
        let yi = (p.y.floor() as i32 & 255) as usize;
        let zi = (p.z.floor() as i32 & 255) as usize;

        let x = p.x - p.x.floor();
        let y = p.y - p.y.floor();
        let z = p.z - p.z.floor();

        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let a = self.perm[xi] as usize + yi;
        let aa = self.perm[a] as usize + zi;
        let ab = self.perm[a + 1] as usize + zi;
        let b = self.perm[xi + 1] as usize + yi;
        let ba = self.perm[b] as usize + zi;
        let bb = self.perm[b + 1] as usize + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(
                    u,
                    grad(self.perm[aa], x, y, z),
                    grad(self.perm[ba], x - 1.0, y, z),
                ),
                lerp(
                    u,
                    grad(self.perm[ab], x, y - 1.0, z),
                    grad(self.perm[bb], x - 1.0, y - 1.0, z),
                ),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(self.perm[aa + 1], x, y, z - 1.0),
                    grad(self.perm[ba + 1], x - 1.0, y, z - 1.0),
                ),
                lerp(
                    u,
                    grad(self.perm[ab + 1], x, y - 1.0, z - 1.0),
                    grad(self.perm[bb + 1], x - 1.0, y - 1.0, z - 1.0),
                ),
            ),
        )
    }

    /// Sum of absolute noise octaves.
    pub fn turbulence(&self, p: Vec3A, lacunarity: f32, gain: f32, octaves: u32) -> f32 {
        let mut sum = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        for _ in 0..octaves {
            sum += self.noise(p * frequency).abs() * amplitude;
            frequency *= lacunarity;
            amplitude *= gain;
        }
        sum
    }
}

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

fn grad(hash: u8, x: f32, y: f32, z: f32) -> f32 {
    // Gradient picked from the 12 edge directions of a cube.
    match hash & 15 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x + z,
        5 => -x + z,
        6 => x - z,
        7 => -x - z,
        8 => y + z,
        9 => -y + z,
        10 => y - z,
        11 => -y - z,
        12 => x + y,
        13 => -y + z,
        14 => -x + y,
        _ => -y - z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn solid_ignores_coordinates() {
        let t = Texture::solid(Vec3A::new(0.2, 0.4, 0.6));
        assert_eq!(t.sample(0.0, 0.0, Vec3A::ZERO), Vec3A::new(0.2, 0.4, 0.6));
        assert_eq!(
            t.sample(0.7, 0.3, Vec3A::new(5.0, -2.0, 1.0)),
            Vec3A::new(0.2, 0.4, 0.6)
        );
    }

    #[test]
    fn checker_alternates_cells() {
        let t = Texture::checker(Vec3A::ONE, Vec3A::ZERO, 1.0);
        assert_eq!(t.sample(0.5, 0.5, Vec3A::ZERO), Vec3A::ONE);
        assert_eq!(t.sample(1.5, 0.5, Vec3A::ZERO), Vec3A::ZERO);
        assert_eq!(t.sample(1.5, 1.5, Vec3A::ZERO), Vec3A::ONE);
        // Negative coordinates keep alternating instead of mirroring.
        assert_eq!(t.sample(-0.5, 0.5, Vec3A::ZERO), Vec3A::ZERO);
    }

    #[test]
    fn perlin_is_deterministic_per_seed_and_in_range() {
        let mut rng1 = ChaCha20Rng::seed_from_u64(7);
        let mut rng2 = ChaCha20Rng::seed_from_u64(7);
        let t1 = Texture::perlin(3.0, 0.6, 5, &mut rng1);
        let t2 = Texture::perlin(3.0, 0.6, 5, &mut rng2);

        for i in 0..32 {
            let p = Vec3A::new(i as f32 * 0.37, i as f32 * 0.11, 1.5);
            let c1 = t1.sample(0.0, 0.0, p);
            let c2 = t2.sample(0.0, 0.0, p);
            assert_eq!(c1, c2);
            assert!(c1.x >= 0.0 && c1.x <= 1.0);
            // Grayscale: all channels equal.
            assert_eq!(c1.x, c1.y);
            assert_eq!(c1.y, c1.z);
        }
    }

    #[test]
    fn image_sampling_wraps_and_scales() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        img.put_pixel(1, 0, image::Rgb([0, 255, 0]));
        img.put_pixel(0, 1, image::Rgb([0, 0, 255]));
        img.put_pixel(1, 1, image::Rgb([255, 255, 255]));
        let t = Texture::image(img);

        // v = 1 is the top row in image space.
        assert_eq!(t.sample(0.1, 0.9, Vec3A::ZERO), Vec3A::new(1.0, 0.0, 0.0));
        assert_eq!(t.sample(0.6, 0.9, Vec3A::ZERO), Vec3A::new(0.0, 1.0, 0.0));
        assert_eq!(t.sample(0.1, 0.4, Vec3A::ZERO), Vec3A::new(0.0, 0.0, 1.0));
        // One full period to the right samples the same texel.
        assert_eq!(
            t.sample(1.1, 0.9, Vec3A::ZERO),
            t.sample(0.1, 0.9, Vec3A::ZERO)
        );
    }

    #[test]
    fn missing_image_fails_fast() {
        let err = Texture::image_from_path("no/such/texture.png").unwrap_err();
        assert!(matches!(err, RenderError::Image { .. }));
    }
}
