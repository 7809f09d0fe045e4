//! The built-in demo scene.
//!
//! A textured floor under a field of random spheres, lit by two colored
//! point lights. All randomness flows from one explicit seeded RNG, so the
//! same seed always produces the same scene; the renderer itself consumes
//! no randomness at all.

use glam::Vec3A;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::config::Config;
use crate::error::RenderError;
use crate::light::Light;
use crate::material::{Material, ShadingMode};
use crate::scene::Scene;
use crate::shapes::Object;
use crate::texture::Texture;

/// Build the demo scene from the configuration.
///
/// Fails fast when the configured floor texture image cannot be loaded;
/// nothing is rendered in that case.
pub fn demo_scene(config: &Config) -> Result<Scene, RenderError> {
    let mut rng = ChaCha20Rng::seed_from_u64(config.scene.seed);
    let background = Vec3A::from_array(config.camera.background);
    let mut scene = Scene::new(background);

    let perlin = scene.add_texture(Texture::perlin(3.0, 0.6, 5, &mut rng));
    let floor = match &config.scene.floor_texture {
        Some(path) => scene.add_texture(Texture::image_from_path(path)?),
        None => scene.add_texture(Texture::checker(
            Vec3A::new(0.4, 0.2, 0.2),
            Vec3A::splat(0.1),
            10.0,
        )),
    };
    let green = scene.add_texture(Texture::solid(Vec3A::new(0.1, 0.6, 0.1)));
    let blue = scene.add_texture(Texture::solid(Vec3A::new(0.1, 0.2, 0.7)));

    let materials = [
        scene.add_material(Material::new(perlin, 0.0, ShadingMode::Standard)),
        scene.add_material(Material::new(floor, 0.0, ShadingMode::Standard)),
        scene.add_material(Material::new(green, 0.7, ShadingMode::Reflective)),
        scene.add_material(Material::new(blue, 0.0, ShadingMode::Standard)),
    ];

    scene.add_object(Object::plane(Vec3A::ZERO, Vec3A::Y, materials[1]));

    for _ in 0..config.scene.sphere_count {
        let radius: f32 = rng.random();
        let center = Vec3A::new(
            rng.random_range(-5.0..5.0),
            radius,
            rng.random_range(-5.0..5.0),
        );
        let material = materials[rng.random_range(0..materials.len())];
        scene.add_object(Object::sphere(center, radius, material));
    }

    scene.add_light(Light::point(
        Vec3A::new(0.6, 4.0, 5.0),
        Vec3A::new(0.9, 0.2, 0.3),
        2.0,
    ));
    scene.add_light(Light::point(
        Vec3A::new(4.2, 4.3, 2.0),
        Vec3A::new(0.4, 0.2, 0.7),
        2.4,
    ));

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    fn config_with_seed(seed: u64) -> Config {
        Config {
            scene: SceneConfig {
                seed,
                sphere_count: 10,
                floor_texture: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn scene_has_floor_spheres_and_lights() {
        let scene = demo_scene(&config_with_seed(1)).unwrap();
        assert_eq!(scene.objects.len(), 11);
        assert_eq!(scene.lights.len(), 2);
        assert_eq!(scene.materials.len(), 4);
        assert_eq!(scene.textures.len(), 4);
    }

    #[test]
    fn same_seed_same_scene() {
        let a = demo_scene(&config_with_seed(7)).unwrap();
        let b = demo_scene(&config_with_seed(7)).unwrap();

        for (x, y) in a.objects.iter().zip(&b.objects) {
            assert_eq!(x.position, y.position);
        }
    }

    #[test]
    fn different_seed_different_scene() {
        let a = demo_scene(&config_with_seed(1)).unwrap();
        let b = demo_scene(&config_with_seed(2)).unwrap();

        let same = a
            .objects
            .iter()
            .zip(&b.objects)
            .all(|(x, y)| x.position == y.position);
        assert!(!same);
    }

    #[test]
    fn missing_floor_texture_fails_before_rendering() {
        let mut config = config_with_seed(1);
        config.scene.floor_texture = Some("missing/floor.png".to_string());

        let err = demo_scene(&config).unwrap_err();
        assert!(matches!(err, RenderError::Image { .. }));
    }
}
