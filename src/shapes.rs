//! Geometric primitives and ray intersection.
//!
//! The primitive set is a closed enum so intersection code stays centrally
//! testable; adding a shape means adding a variant here, not a new trait
//! object. Each primitive answers three pure queries against its fixed
//! geometry: intersection distance, surface normal, and UV coordinates.

use glam::{Vec2, Vec3A};

use crate::material::MaterialId;
use crate::ray::Ray;

/// Epsilon shared by the plane-family and triangle tests.
pub const GEOM_EPSILON: f32 = 1e-6;

/// The closed set of primitive kinds.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    /// Sphere of the given radius around the object position.
    Sphere {
        /// Sphere radius (non-negative).
        radius: f32,
    },
    /// Infinite plane through the object position.
    Plane {
        /// Unit plane normal.
        normal: Vec3A,
    },
    /// Flat disk: a plane hit that must also fall within the radius.
    Disk {
        /// Unit disk normal.
        normal: Vec3A,
        /// Disk radius.
        radius: f32,
    },
    /// Single-sided triangle: rays arriving from the back face miss.
    Triangle {
        /// First vertex.
        v1: Vec3A,
        /// Second vertex.
        v2: Vec3A,
        /// Third vertex.
        v3: Vec3A,
    },
}

/// A renderable object: a primitive anchored at a position with a material.
///
/// `position` is the semantic anchor (sphere center, plane/disk point,
/// triangle centroid), not an intersection point. The material is a pool
/// index into [`crate::scene::Scene`]; many objects typically share one.
#[derive(Debug, Clone, Copy)]
pub struct Object {
    /// Anchor point of the primitive.
    pub position: Vec3A,
    /// The primitive geometry.
    pub shape: Shape,
    /// Index of this object's material in the scene pool.
    pub material: MaterialId,
}

impl Object {
    /// Create a sphere centered at `center`.
    pub fn sphere(center: Vec3A, radius: f32, material: MaterialId) -> Self {
        Self {
            position: center,
            shape: Shape::Sphere {
                radius: radius.max(0.0),
            },
            material,
        }
    }

    /// Create an infinite plane through `point`.
    pub fn plane(point: Vec3A, normal: Vec3A, material: MaterialId) -> Self {
        Self {
            position: point,
            shape: Shape::Plane {
                normal: normal.normalize(),
            },
            material,
        }
    }

    /// Create a disk centered at `center`.
    pub fn disk(center: Vec3A, normal: Vec3A, radius: f32, material: MaterialId) -> Self {
        Self {
            position: center,
            shape: Shape::Disk {
                normal: normal.normalize(),
                radius: radius.max(0.0),
            },
            material,
        }
    }

    /// Create a triangle from three vertices; the anchor is the centroid.
    pub fn triangle(v1: Vec3A, v2: Vec3A, v3: Vec3A, material: MaterialId) -> Self {
        Self {
            position: (v1 + v2 + v3) / 3.0,
            shape: Shape::Triangle { v1, v2, v3 },
            material,
        }
    }

    /// Test the ray against this primitive.
    ///
    /// Returns the distance along the ray to the nearest acceptable hit, or
    /// `None`. Distances are always positive; hits behind the origin and
    /// degenerate configurations (near-parallel plane rays, zero-determinant
    /// triangles) report a miss, never an error.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        match self.shape {
            Shape::Sphere { radius } => self.intersect_sphere(ray, radius),
            Shape::Plane { normal } => self.intersect_plane(ray, normal),
            Shape::Disk { normal, radius } => {
                let t = self.intersect_plane(ray, normal)?;
                // Squared planar distance from the disk center against the
                // squared radius. (An earlier revision compared a linear
                // distance taken from the ray origin against radius²; see
                // DESIGN.md for the corrected contract.)
                let d2 = (ray.at(t) - self.position).length_squared();
                (d2 <= radius * radius).then_some(t)
            }
            Shape::Triangle { v1, v2, v3 } => {
                Self::intersect_triangle(ray, v1, v2, v3).map(|(t, _, _)| t)
            }
        }
    }

    fn intersect_sphere(&self, ray: &Ray, radius: f32) -> Option<f32> {
        let radius2 = radius * radius;
        let l = self.position - ray.origin;

        let tca = l.dot(ray.direction);
        let d2 = l.dot(l) - tca * tca;
        if d2 > radius2 {
            return None;
        }

        let thc = (radius2 - d2).sqrt();
        let t0 = tca - thc;
        let t1 = tca + thc;

        // Nearer root first; fall back to the farther one when the nearer is
        // behind the origin, reject when both are.
        let t = if t0 < 0.0 { t1 } else { t0 };
        (t >= 0.0).then_some(t)
    }

    fn intersect_plane(&self, ray: &Ray, normal: Vec3A) -> Option<f32> {
        let denom = normal.dot(ray.direction);
        if denom.abs() > GEOM_EPSILON {
            let t = (self.position - ray.origin).dot(normal) / denom;
            if t >= GEOM_EPSILON {
                return Some(t);
            }
        }
        None
    }

    /// Möller–Trumbore. Returns (t, u, v) with barycentric (u, v).
    fn intersect_triangle(ray: &Ray, v1: Vec3A, v2: Vec3A, v3: Vec3A) -> Option<(f32, f32, f32)> {
        let e1 = v2 - v1;
        let e2 = v3 - v1;
        let pvec = ray.direction.cross(e2);
        let det = e1.dot(pvec);

        // Back-facing or degenerate.
        if det < GEOM_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.origin - v1;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(e1);
        let v = ray.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(qvec) * inv_det;
        (t >= GEOM_EPSILON).then_some((t, u, v))
    }

    /// Unit surface normal at a point on the primitive.
    pub fn normal_at(&self, point: Vec3A) -> Vec3A {
        match self.shape {
            Shape::Sphere { .. } => (point - self.position).normalize(),
            Shape::Plane { normal } | Shape::Disk { normal, .. } => normal,
            Shape::Triangle { v1, v2, v3 } => (v2 - v1).cross(v3 - v1).normalize(),
        }
    }

    /// UV coordinates at a point on the primitive.
    ///
    /// Spheres use a spherical mapping, planes and disks a tangent-basis
    /// planar mapping (unbounded; textures tile), triangles their
    /// barycentric coordinates.
    pub fn uv_at(&self, point: Vec3A) -> Vec2 {
        match self.shape {
            Shape::Sphere { radius } => {
                let d = (point - self.position) / radius.max(GEOM_EPSILON);
                Vec2::new(
                    d.x.atan2(d.z) / (2.0 * std::f32::consts::PI) + 0.5,
                    d.y.clamp(-1.0, 1.0).asin() / std::f32::consts::PI + 0.5,
                )
            }
            Shape::Plane { normal } | Shape::Disk { normal, .. } => {
                let (t1, t2) = tangent_basis(normal);
                let rel = point - self.position;
                Vec2::new(rel.dot(t1), rel.dot(t2))
            }
            Shape::Triangle { v1, v2, v3 } => barycentric_uv(point, v1, v2, v3),
        }
    }
}

/// Orthonormal tangent basis for a unit normal.
fn tangent_basis(normal: Vec3A) -> (Vec3A, Vec3A) {
    let helper = if normal.x.abs() > 0.9 {
        Vec3A::Y
    } else {
        Vec3A::X
    };
    let t1 = normal.cross(helper).normalize();
    let t2 = normal.cross(t1);
    (t1, t2)
}

/// Barycentric (u, v) of `point` with respect to the triangle edges at `v1`.
fn barycentric_uv(point: Vec3A, v1: Vec3A, v2: Vec3A, v3: Vec3A) -> Vec2 {
    let e1 = v2 - v1;
    let e2 = v3 - v1;
    let w = point - v1;

    let d11 = e1.dot(e1);
    let d12 = e1.dot(e2);
    let d22 = e2.dot(e2);
    let dw1 = w.dot(e1);
    let dw2 = w.dot(e2);

    let denom = d11 * d22 - d12 * d12;
    if denom.abs() < GEOM_EPSILON {
        return Vec2::ZERO;
    }
    Vec2::new(
        (d22 * dw1 - d12 * dw2) / denom,
        (d11 * dw2 - d12 * dw1) / denom,
    )
}

#[cfg(test)]
fn test_material() -> MaterialId {
    MaterialId(0)
}

#[test]
fn sphere_hit_distance_along_axis() {
    // Sphere at distance d along the ray: hit at d - r.
    let s = Object::sphere(Vec3A::new(0.0, 0.0, -10.0), 2.0, test_material());
    let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));

    let t = s.intersect(&r).unwrap();
    assert!((t - 8.0).abs() < 1e-4);
}

#[test]
fn sphere_from_inside_uses_far_root() {
    let s = Object::sphere(Vec3A::ZERO, 3.0, test_material());
    let r = Ray::new(Vec3A::ZERO, Vec3A::new(1.0, 0.0, 0.0));

    let t = s.intersect(&r).unwrap();
    assert!((t - 3.0).abs() < 1e-4);
}

#[test]
fn sphere_behind_origin_misses() {
    let s = Object::sphere(Vec3A::new(0.0, 0.0, 5.0), 1.0, test_material());
    let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));

    assert!(s.intersect(&r).is_none());
}

#[test]
fn plane_rejects_parallel_ray() {
    let p = Object::plane(Vec3A::ZERO, Vec3A::Y, test_material());
    let r = Ray::new(Vec3A::new(0.0, 1.0, 0.0), Vec3A::new(1.0, 0.0, 0.0));

    assert!(p.intersect(&r).is_none());
}

#[test]
fn plane_hit_from_above() {
    let p = Object::plane(Vec3A::ZERO, Vec3A::Y, test_material());
    let r = Ray::new(Vec3A::new(0.0, 4.0, 0.0), Vec3A::new(0.0, -1.0, 0.0));

    let t = p.intersect(&r).unwrap();
    assert!((t - 4.0).abs() < 1e-4);
}

#[test]
fn disk_respects_radius() {
    let d = Object::disk(Vec3A::ZERO, Vec3A::Y, 1.0, test_material());

    let inside = Ray::new(Vec3A::new(0.5, 2.0, 0.0), Vec3A::new(0.0, -1.0, 0.0));
    assert!(d.intersect(&inside).is_some());

    let outside = Ray::new(Vec3A::new(1.5, 2.0, 0.0), Vec3A::new(0.0, -1.0, 0.0));
    assert!(d.intersect(&outside).is_none());
}

#[test]
fn disk_radius_check_is_planar_distance() {
    // A grazing hit far from the ray origin but inside the radius: the check
    // must use the in-plane distance from the disk center, not any distance
    // measured from the ray origin.
    let d = Object::disk(Vec3A::ZERO, Vec3A::Y, 1.0, test_material());
    let r = Ray::new(
        Vec3A::new(0.9, 100.0, 0.0),
        Vec3A::new(0.0, -1.0, 0.0),
    );

    assert!(d.intersect(&r).is_some());
}

#[test]
fn triangle_front_face_hits_back_face_misses() {
    let v1 = Vec3A::new(-1.0, -1.0, 0.0);
    let v2 = Vec3A::new(1.0, -1.0, 0.0);
    let v3 = Vec3A::new(0.0, 1.0, 0.0);
    let tri = Object::triangle(v1, v2, v3, test_material());

    // Winding makes the front face point toward +z.
    let front = Ray::new(Vec3A::new(0.0, 0.0, 5.0), Vec3A::new(0.0, 0.0, -1.0));
    let back = Ray::new(Vec3A::new(0.0, 0.0, -5.0), Vec3A::new(0.0, 0.0, 1.0));

    assert!(tri.intersect(&front).is_some());
    assert!(tri.intersect(&back).is_none());
}

#[test]
fn triangle_outside_edges_misses() {
    let tri = Object::triangle(
        Vec3A::new(-1.0, -1.0, 0.0),
        Vec3A::new(1.0, -1.0, 0.0),
        Vec3A::new(0.0, 1.0, 0.0),
        test_material(),
    );
    let r = Ray::new(Vec3A::new(2.0, 2.0, 5.0), Vec3A::new(0.0, 0.0, -1.0));

    assert!(tri.intersect(&r).is_none());
}

#[test]
fn normals_are_unit_length() {
    let m = test_material();
    let sphere = Object::sphere(Vec3A::ZERO, 2.0, m);
    let tri = Object::triangle(
        Vec3A::ZERO,
        Vec3A::new(3.0, 0.0, 0.0),
        Vec3A::new(0.0, 3.0, 0.0),
        m,
    );

    let n1 = sphere.normal_at(Vec3A::new(0.0, 2.0, 0.0));
    let n2 = tri.normal_at(Vec3A::new(0.5, 0.5, 0.0));
    assert!((n1.length() - 1.0).abs() < 1e-5);
    assert!((n2.length() - 1.0).abs() < 1e-5);
}

#[test]
fn sphere_uv_covers_poles_and_equator() {
    let s = Object::sphere(Vec3A::ZERO, 1.0, test_material());

    let top = s.uv_at(Vec3A::new(0.0, 1.0, 0.0));
    assert!((top.y - 1.0).abs() < 1e-4);

    let front = s.uv_at(Vec3A::new(0.0, 0.0, 1.0));
    assert!((front.x - 0.5).abs() < 1e-4);
    assert!((front.y - 0.5).abs() < 1e-4);
}

#[test]
fn triangle_uv_is_barycentric() {
    let v1 = Vec3A::ZERO;
    let v2 = Vec3A::new(1.0, 0.0, 0.0);
    let v3 = Vec3A::new(0.0, 1.0, 0.0);
    let tri = Object::triangle(v1, v2, v3, test_material());

    let at_v2 = tri.uv_at(v2);
    assert!((at_v2.x - 1.0).abs() < 1e-4 && at_v2.y.abs() < 1e-4);

    let at_v3 = tri.uv_at(v3);
    assert!(at_v3.x.abs() < 1e-4 && (at_v3.y - 1.0).abs() < 1e-4);
}
