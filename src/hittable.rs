//! Nearest-hit queries over the scene's object list.
//!
//! A linear scan keeping the minimum strictly positive distance; ties go to
//! the first object in iteration order. O(objects) per ray, which is fine at
//! the scene sizes this renderer targets; spatial acceleration is out of
//! scope.

use glam::{Vec2, Vec3A};

use crate::material::MaterialId;
use crate::ray::Ray;
use crate::shapes::Object;

/// Ray-object intersection information.
///
/// Built fresh per query and consumed by the shader; never stored.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Distance along the ray to the intersection.
    pub t: f32,
    /// World-space intersection point.
    pub point: Vec3A,
    /// Unit surface normal at the intersection.
    pub normal: Vec3A,
    /// Surface UV coordinates at the intersection.
    pub uv: Vec2,
    /// Material of the hit object.
    pub material: MaterialId,
}

/// Find the nearest hit of `ray` among `objects`.
pub fn nearest_hit(ray: &Ray, objects: &[Object]) -> Option<HitRecord> {
    let mut nearest: Option<(f32, &Object)> = None;
    for object in objects {
        if let Some(t) = object.intersect(ray) {
            if t > 0.0 && nearest.map_or(true, |(best, _)| t < best) {
                nearest = Some((t, object));
            }
        }
    }

    nearest.map(|(t, object)| {
        let point = ray.at(t);
        HitRecord {
            t,
            point,
            normal: object.normal_at(point),
            uv: object.uv_at(point),
            material: object.material,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spheres_at_depths(depths: &[f32]) -> Vec<Object> {
        depths
            .iter()
            .enumerate()
            .map(|(i, &z)| Object::sphere(Vec3A::new(0.0, 0.0, z), 1.0, MaterialId(i)))
            .collect()
    }

    #[test]
    fn picks_the_nearest_object() {
        let objects = spheres_at_depths(&[-20.0, -5.0, -12.0]);
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));

        let hit = nearest_hit(&ray, &objects).unwrap();
        assert_eq!(hit.material, MaterialId(1));
        assert!((hit.t - 4.0).abs() < 1e-4);
    }

    #[test]
    fn tie_goes_to_the_first_object() {
        // Two identical spheres; the earlier one must win.
        let mut objects = spheres_at_depths(&[-5.0]);
        objects.push(Object::sphere(
            Vec3A::new(0.0, 0.0, -5.0),
            1.0,
            MaterialId(9),
        ));
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));

        let hit = nearest_hit(&ray, &objects).unwrap();
        assert_eq!(hit.material, MaterialId(0));
    }

    #[test]
    fn miss_returns_none() {
        let objects = spheres_at_depths(&[-5.0]);
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 1.0, 0.0));

        assert!(nearest_hit(&ray, &objects).is_none());
    }

    #[test]
    fn record_carries_surface_data() {
        let objects = spheres_at_depths(&[-5.0]);
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));

        let hit = nearest_hit(&ray, &objects).unwrap();
        assert_eq!(hit.point, Vec3A::new(0.0, 0.0, -4.0));
        // Normal faces the ray origin.
        assert_eq!(hit.normal, Vec3A::new(0.0, 0.0, 1.0));
    }
}
