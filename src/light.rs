//! Light sources.
//!
//! Point lights radiate from a position with linear distance falloff;
//! directional lights arrive from a fixed direction at constant strength,
//! as if infinitely far away.

use glam::Vec3A;

/// The closed set of light kinds.
#[derive(Debug, Clone, Copy)]
pub enum Light {
    /// Omnidirectional light at a position.
    Point {
        /// World-space position.
        position: Vec3A,
        /// Light color, linear RGB in [0, 1].
        color: Vec3A,
        /// Scalar intensity.
        intensity: f32,
    },
    /// Parallel light with a constant direction (sun-style).
    Directional {
        /// Direction the light travels, from the source toward the scene.
        direction: Vec3A,
        /// Light color, linear RGB in [0, 1].
        color: Vec3A,
        /// Scalar intensity.
        intensity: f32,
    },
}

impl Light {
    /// A point light at `position`.
    pub fn point(position: Vec3A, color: Vec3A, intensity: f32) -> Self {
        Self::Point {
            position,
            color,
            intensity,
        }
    }

    /// A directional light traveling along `direction`.
    pub fn directional(direction: Vec3A, color: Vec3A, intensity: f32) -> Self {
        Self::Directional {
            direction,
            color,
            intensity,
        }
    }

    /// Unit vector from `point` toward the light.
    ///
    /// Returns zero when the geometry is degenerate (light exactly at the
    /// point, zero-length direction); callers treat that as no contribution.
    pub fn direction_from(&self, point: Vec3A) -> Vec3A {
        match self {
            Self::Point { position, .. } => (*position - point).normalize_or_zero(),
            Self::Directional { direction, .. } => (-*direction).normalize_or_zero(),
        }
    }

    /// Distance from `point` to the light; infinite for directional lights.
    pub fn distance_from(&self, point: Vec3A) -> f32 {
        match self {
            Self::Point { position, .. } => (*position - point).length(),
            Self::Directional { .. } => f32::INFINITY,
        }
    }

    /// Falloff divisor at the given distance.
    ///
    /// Point lights attenuate linearly with distance; directional lights do
    /// not attenuate.
    pub fn attenuation(&self, distance: f32) -> f32 {
        match self {
            Self::Point { .. } => distance.max(1e-4),
            Self::Directional { .. } => 1.0,
        }
    }

    /// Color scaled by intensity.
    pub fn radiance(&self) -> Vec3A {
        match self {
            Self::Point {
                color, intensity, ..
            }
            | Self::Directional {
                color, intensity, ..
            } => *color * *intensity,
        }
    }
}

#[test]
fn point_light_direction_and_distance() {
    let l = Light::point(Vec3A::new(0.0, 10.0, 0.0), Vec3A::ONE, 1.0);
    let p = Vec3A::new(0.0, 2.0, 0.0);

    assert_eq!(l.direction_from(p), Vec3A::Y);
    assert_eq!(l.distance_from(p), 8.0);
    assert_eq!(l.attenuation(8.0), 8.0);
}

#[test]
fn directional_light_is_infinitely_far() {
    let l = Light::directional(Vec3A::new(0.0, -1.0, 0.0), Vec3A::ONE, 1.0);
    let p = Vec3A::new(3.0, 0.0, -2.0);

    assert_eq!(l.direction_from(p), Vec3A::Y);
    assert_eq!(l.distance_from(p), f32::INFINITY);
    assert_eq!(l.attenuation(f32::INFINITY), 1.0);
}

#[test]
fn degenerate_directions_are_zero_not_fatal() {
    let at_point = Light::point(Vec3A::ONE, Vec3A::ONE, 1.0);
    assert_eq!(at_point.direction_from(Vec3A::ONE), Vec3A::ZERO);

    let zero_dir = Light::directional(Vec3A::ZERO, Vec3A::ONE, 1.0);
    assert_eq!(zero_dir.direction_from(Vec3A::ZERO), Vec3A::ZERO);
}
