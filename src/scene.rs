//! Scene state and the recursive Whitted shader.
//!
//! The scene owns four read-only pools (objects, materials, textures,
//! lights) plus a background color. Objects refer to materials by index and
//! materials to textures by index, so many objects can share one material
//! without ownership cycles. All pools are read-only for the duration of a
//! render pass; the parallel pixel loop shares the scene without locking.

use glam::Vec3A;

use crate::hittable::{nearest_hit, HitRecord};
use crate::light::Light;
use crate::material::{Material, MaterialId, ShadingMode};
use crate::ray::Ray;
use crate::shapes::Object;
use crate::texture::{Texture, TextureId};

/// Maximum reflective bounce depth. Bounces past this return the background,
/// bounding the work a mirror cycle can generate.
pub const MAX_DEPTH: u8 = 8;

/// Offset applied along the normal when spawning shadow and reflection rays,
/// so they cannot re-hit the surface they originate from.
const SURFACE_EPSILON: f32 = 1e-4;

/// All state read by the renderer during one pass.
#[derive(Debug, Default)]
pub struct Scene {
    /// Renderable objects.
    pub objects: Vec<Object>,
    /// Material pool, indexed by [`MaterialId`].
    pub materials: Vec<Material>,
    /// Texture pool, indexed by [`TextureId`].
    pub textures: Vec<Texture>,
    /// Light sources.
    pub lights: Vec<Light>,
    /// Color returned for rays that miss everything or exhaust the bounce
    /// budget.
    pub background: Vec3A,
}

impl Scene {
    /// An empty scene with the given background color.
    pub fn new(background: Vec3A) -> Self {
        Self {
            background,
            ..Default::default()
        }
    }

    /// Add a texture to the pool, returning its id.
    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    /// Add a material to the pool, returning its id.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Add an object to the scene.
    pub fn add_object(&mut self, object: Object) {
        self.objects.push(object);
    }

    /// Add a light to the scene.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Nearest intersection of `ray` with the scene.
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        nearest_hit(ray, &self.objects)
    }

    /// Recursively shade `ray`.
    ///
    /// Primary rays start at depth 0. A miss or an exhausted bounce budget
    /// yields the background color; the result is clamped to [0, 1] per
    /// channel in every branch.
    pub fn shade(&self, ray: &Ray, depth: u8) -> Vec3A {
        if depth > MAX_DEPTH {
            return self.background;
        }
        let Some(hit) = self.intersect(ray) else {
            return self.background;
        };

        let material = &self.materials[hit.material.0];
        let surface = self.textures[material.texture.0].sample(hit.uv.x, hit.uv.y, hit.point);

        let color = match material.mode {
            ShadingMode::Standard => self.direct_light(&hit, surface),
            ShadingMode::Reflective => {
                let direct = self.direct_light(&hit, surface);

                let reflect_dir = reflect(ray.direction, hit.normal).normalize();
                let reflect_origin = offset_origin(hit.point, hit.normal, reflect_dir);
                let reflected = self.shade(&Ray::new(reflect_origin, reflect_dir), depth + 1);

                material.reflectiveness * reflected + (1.0 - material.reflectiveness) * direct
            }
        };

        color.clamp(Vec3A::ZERO, Vec3A::ONE)
    }

    /// Direct lighting at a hit: the sum over lights of the attenuated
    /// Lambert term, with hard shadows.
    fn direct_light(&self, hit: &HitRecord, surface: Vec3A) -> Vec3A {
        let mut total = Vec3A::ZERO;
        for light in &self.lights {
            let light_dir = light.direction_from(hit.point);
            if light_dir == Vec3A::ZERO {
                continue;
            }
            let light_dist = light.distance_from(hit.point);

            // An occluder strictly closer than the light blocks it entirely.
            let shadow_origin = offset_origin(hit.point, hit.normal, light_dir);
            let shadow_ray = Ray::new(shadow_origin, light_dir);
            if let Some(occluder) = self.intersect(&shadow_ray) {
                if occluder.t < light_dist {
                    continue;
                }
            }

            let lambert = light_dir.dot(hit.normal).max(0.0);
            total += surface * light.radiance() * lambert / light.attenuation(light_dist);
        }
        total
    }
}

/// Mirror `v` about the unit normal `n`.
fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}

/// Nudge a secondary-ray origin off the surface, on whichever side `dir`
/// leaves through.
fn offset_origin(point: Vec3A, normal: Vec3A, dir: Vec3A) -> Vec3A {
    if dir.dot(normal) < 0.0 {
        point - normal * SURFACE_EPSILON
    } else {
        point + normal * SURFACE_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_scene(background: Vec3A) -> (Scene, MaterialId) {
        let mut scene = Scene::new(background);
        let tex = scene.add_texture(Texture::solid(Vec3A::new(0.6, 0.6, 0.6)));
        let mat = scene.add_material(Material::new(tex, 0.0, ShadingMode::Standard));
        (scene, mat)
    }

    #[test]
    fn miss_returns_background() {
        let (scene, _) = solid_scene(Vec3A::new(0.1, 0.2, 0.3));
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 1.0, 0.0));

        assert_eq!(scene.shade(&ray, 0), Vec3A::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn lambert_shading_with_overhead_sun() {
        // A directional light straight down on an upward plane: lambert 1,
        // attenuation 1, so the result is exactly the texture color.
        let (mut scene, mat) = solid_scene(Vec3A::ZERO);
        scene.add_object(Object::plane(Vec3A::ZERO, Vec3A::Y, mat));
        scene.add_light(Light::directional(Vec3A::new(0.0, -1.0, 0.0), Vec3A::ONE, 1.0));

        let ray = Ray::new(Vec3A::new(0.0, 5.0, 0.0), Vec3A::new(0.0, -1.0, 0.0));
        let color = scene.shade(&ray, 0);
        assert!((color - Vec3A::new(0.6, 0.6, 0.6)).abs().max_element() < 1e-5);
    }

    #[test]
    fn surface_does_not_shadow_itself() {
        // A lone sphere lit from above: the lit pole must not be darkened by
        // a self-intersecting shadow ray.
        let (mut scene, mat) = solid_scene(Vec3A::ZERO);
        scene.add_object(Object::sphere(Vec3A::ZERO, 1.0, mat));
        scene.add_light(Light::point(Vec3A::new(0.0, 10.0, 0.0), Vec3A::ONE, 10.0));

        let ray = Ray::new(Vec3A::new(0.0, 5.0, 0.0), Vec3A::new(0.0, -1.0, 0.0));
        let color = scene.shade(&ray, 0);
        assert!(color.x > 0.0);
    }

    #[test]
    fn shadow_ray_from_surface_hits_nothing_at_zero_distance() {
        let (mut scene, mat) = solid_scene(Vec3A::ZERO);
        scene.add_object(Object::sphere(Vec3A::ZERO, 1.0, mat));

        // Cast from just off the north pole along the normal.
        let origin = Vec3A::new(0.0, 1.0 + 1e-4, 0.0);
        let ray = Ray::new(origin, Vec3A::Y);
        assert!(scene.intersect(&ray).is_none());
    }

    #[test]
    fn occluder_blocks_a_point_light() {
        let (mut scene, mat) = solid_scene(Vec3A::ZERO);
        scene.add_object(Object::plane(Vec3A::ZERO, Vec3A::Y, mat));
        // Blocker between the plane and the light.
        scene.add_object(Object::sphere(Vec3A::new(0.0, 3.0, 0.0), 1.0, mat));
        scene.add_light(Light::point(Vec3A::new(0.0, 6.0, 0.0), Vec3A::ONE, 10.0));

        let ray = Ray::new(Vec3A::new(0.0, 1.0, 0.1), Vec3A::new(0.0, -1.0, 0.0));
        let color = scene.shade(&ray, 0);
        assert_eq!(color, Vec3A::ZERO);
    }

    #[test]
    fn mirror_box_terminates_at_depth_cap() {
        // Two facing mirrors and no lights: the only possible outcome is the
        // background, reached after the bounce budget runs out.
        let background = Vec3A::new(0.25, 0.5, 0.75);
        let mut scene = Scene::new(background);
        let tex = scene.add_texture(Texture::solid(Vec3A::ONE));
        let mirror = scene.add_material(Material::new(tex, 1.0, ShadingMode::Reflective));
        scene.add_object(Object::plane(Vec3A::new(0.0, 0.0, -10.0), Vec3A::Z, mirror));
        scene.add_object(Object::plane(Vec3A::new(0.0, 0.0, 10.0), -Vec3A::Z, mirror));

        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));
        assert_eq!(scene.shade(&ray, 0), background);
    }

    #[test]
    fn reflection_mixes_energy_preserving() {
        // A half-mirror floor under a black sky with no lights: direct term
        // is zero, reflection sees the background, so the result is
        // reflectiveness * background.
        let background = Vec3A::new(0.8, 0.4, 0.2);
        let mut scene = Scene::new(background);
        let tex = scene.add_texture(Texture::solid(Vec3A::ONE));
        let mat = scene.add_material(Material::new(tex, 0.5, ShadingMode::Reflective));
        scene.add_object(Object::plane(Vec3A::ZERO, Vec3A::Y, mat));

        let ray = Ray::new(Vec3A::new(0.0, 5.0, 0.0), Vec3A::new(0.0, -1.0, 0.0));
        let color = scene.shade(&ray, 0);
        assert!((color - background * 0.5).abs().max_element() < 1e-5);
    }

    #[test]
    fn output_is_clamped() {
        let (mut scene, _) = solid_scene(Vec3A::ZERO);
        let tex = scene.add_texture(Texture::solid(Vec3A::ONE));
        let mat = scene.add_material(Material::new(tex, 0.0, ShadingMode::Standard));
        scene.add_object(Object::plane(Vec3A::ZERO, Vec3A::Y, mat));
        // Absurdly bright light.
        scene.add_light(Light::point(Vec3A::new(0.0, 1.0, 0.0), Vec3A::ONE, 1e6));

        let ray = Ray::new(Vec3A::new(0.0, 5.0, 0.1), Vec3A::new(0.0, -1.0, 0.0));
        let color = scene.shade(&ray, 0);
        assert_eq!(color, Vec3A::ONE);
    }
}
