//! Ray representation for 3D ray tracing.
//!
//! A ray is r(t) = origin + t * direction. Rays are immutable once built;
//! besides origin and direction they carry the precomputed reciprocal
//! direction and per-axis sign bits that slab-style interval tests index by.

use glam::Vec3A;

/// Ray in 3D space defined by origin and direction.
///
/// Callers normalize `direction` before casting; the type itself does not
/// require unit length.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    pub origin: Vec3A,
    /// Direction vector of the ray.
    pub direction: Vec3A,
    /// Component-wise reciprocal of `direction`, for slab tests.
    pub inv_direction: Vec3A,
    /// Per-axis direction sign: 1 where the direction component is negative.
    pub sign: [usize; 3],
}

impl Ray {
    /// Create a new ray with origin and direction.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        let inv_direction = direction.recip();
        let sign = [
            (direction.x < 0.0) as usize,
            (direction.y < 0.0) as usize,
            (direction.z < 0.0) as usize,
        ];
        Self {
            origin,
            direction,
            inv_direction,
            sign,
        }
    }

    /// Compute the point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }
}

#[test]
fn ray_point_evaluation() {
    let r = Ray::new(Vec3A::new(2.0, 3.0, 4.0), Vec3A::new(1.0, 0.0, 0.0));

    assert_eq!(r.at(0.0), Vec3A::new(2.0, 3.0, 4.0));
    assert_eq!(r.at(1.0), Vec3A::new(3.0, 3.0, 4.0));
    assert_eq!(r.at(-1.0), Vec3A::new(1.0, 3.0, 4.0));
    assert_eq!(r.at(2.5), Vec3A::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_slab_fields() {
    let r = Ray::new(Vec3A::ZERO, Vec3A::new(2.0, -4.0, 1.0));

    assert_eq!(r.inv_direction.x, 0.5);
    assert_eq!(r.inv_direction.y, -0.25);
    assert_eq!(r.sign, [0, 1, 0]);
}
