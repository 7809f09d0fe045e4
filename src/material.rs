//! Surface materials.
//!
//! A material pairs a texture with a reflectiveness factor and a shading
//! mode. Materials live in the scene's pool and are shared by index; a
//! typical scene has many objects per material.

use crate::texture::TextureId;

/// Index of a material in the scene pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialId(pub usize);

/// How a surface responds to light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMode {
    /// Diffuse surface lit directly by the scene lights.
    Standard,
    /// Mirror surface; bounces the ray and mixes in the direct term.
    Reflective,
}

/// Texture reference plus reflection parameters.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    /// Index of the diffuse texture in the scene pool.
    pub texture: TextureId,
    /// Mirror contribution in [0, 1]; only meaningful for `Reflective`.
    pub reflectiveness: f32,
    /// Shading dispatch mode.
    pub mode: ShadingMode,
}

impl Material {
    /// Create a material; reflectiveness is clamped to [0, 1].
    pub fn new(texture: TextureId, reflectiveness: f32, mode: ShadingMode) -> Self {
        Self {
            texture,
            reflectiveness: reflectiveness.clamp(0.0, 1.0),
            mode,
        }
    }
}

#[test]
fn reflectiveness_is_clamped() {
    let m = Material::new(TextureId(0), 1.7, ShadingMode::Reflective);
    assert_eq!(m.reflectiveness, 1.0);

    let m = Material::new(TextureId(0), -0.3, ShadingMode::Standard);
    assert_eq!(m.reflectiveness, 0.0);
}
