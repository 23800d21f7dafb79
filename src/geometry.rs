//! Small 2D geometry helpers shared by movement and physics.
//!
//! Angles are expressed in degrees in the `[0, 360)` range, measured from the
//! positive X axis towards the positive Y axis (screen space, Y grows down).

use glam::Vec2;

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Build a box from two opposite corners, normalizing min/max.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Build a box from its top-left corner and size.
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::from_corners(origin, origin + size)
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strict overlap test; touching edges do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// The same box moved by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

/// Bearing from `from` to `to`, in degrees within `[0, 360)`.
///
/// Returns `0.0` when both points coincide.
pub fn bearing_degrees(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    if d == Vec2::ZERO {
        return 0.0;
    }
    d.y.atan2(d.x).to_degrees().rem_euclid(360.0)
}

/// Offset covering `distance` along `angle_degrees`.
pub fn project(angle_degrees: f32, distance: f32) -> Vec2 {
    Vec2::from_angle(angle_degrees.to_radians()) * distance
}
