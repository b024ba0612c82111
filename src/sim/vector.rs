//! 2D vector helpers for the collision code
//!
//! Pure functions on `Vec2` and vertex slices. `glam` covers dot products and
//! lengths; what lives here is the rotation convention and the pieces of the
//! separating-axis test.

use glam::Vec2;

/// Rotate a vector by `angle` radians (counter-clockwise in a y-up frame)
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[inline]
pub fn dot_product(a: Vec2, b: Vec2) -> f32 {
    a.dot(b)
}

#[inline]
pub fn magnitude(v: Vec2) -> f32 {
    v.length()
}

/// Unit vector in the direction of `v`, or `None` for a zero vector
#[inline]
pub fn normalize(v: Vec2) -> Option<Vec2> {
    v.try_normalize()
}

/// Unit vector in the direction of `v`, or `fallback` for a zero vector
#[inline]
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(fallback)
}

/// Perpendicular vector (rotated 90° counter-clockwise)
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Unit edge normals of a closed polygon, one per edge.
///
/// Degenerate (zero-length) edges contribute no axis.
pub fn find_axes(polygon: &[Vec2]) -> Vec<Vec2> {
    let n = polygon.len();
    let mut axes = Vec::with_capacity(n);
    for i in 0..n {
        let edge = polygon[(i + 1) % n] - polygon[i];
        if let Some(axis) = normalize(perpendicular(edge)) {
            axes.push(axis);
        }
    }
    axes
}

/// Scalar extent of a vertex set projected onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub min: f32,
    pub max: f32,
}

impl Projection {
    /// True if the two intervals share any point
    #[inline]
    pub fn overlaps(&self, other: &Projection) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

/// Project every vertex onto `axis` and keep the extremes
pub fn project(polygon: &[Vec2], axis: Vec2) -> Projection {
    polygon.iter().fold(
        Projection {
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
        },
        |acc, &p| {
            let d = dot_product(p, axis);
            Projection {
                min: acc.min.min(d),
                max: acc.max.max(d),
            }
        },
    )
}
