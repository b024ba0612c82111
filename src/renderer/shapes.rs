//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists so a backend can upload the
//! vertices without further processing.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::vector::rotate;

/// Generate vertices for a thick line segment
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    vec![
        Vertex::at(a1, color),
        Vertex::at(a2, color),
        Vertex::at(b1, color),
        Vertex::at(b1, color),
        Vertex::at(a2, color),
        Vertex::at(b2, color),
    ]
}

/// Generate vertices for a closed polyline through `points`
pub fn outline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity(points.len() * 6);
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        vertices.extend(line(a, b, width, color));
    }
    vertices
}

/// Generate vertices for a filled convex polygon (triangle fan)
pub fn polygon(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for i in 1..points.len() - 1 {
        vertices.push(Vertex::at(points[0], color));
        vertices.push(Vertex::at(points[i], color));
        vertices.push(Vertex::at(points[i + 1], color));
    }
    vertices
}

/// Engine flame behind the ship, in ship-local coordinates.
///
/// A point at the tail joined to a half circle of radius 5 around (0, 10).
pub fn flame_outline(segments: u32) -> Vec<Vec2> {
    let mut points = vec![Vec2::new(0.0, 20.0)];
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * PI;
        points.push(Vec2::new(5.0 * theta.cos(), 10.0 + 5.0 * theta.sin()));
    }
    points
}

/// Place local points at `pos` facing `angle`, the way ship vertices are placed
pub fn to_world(points: &[Vec2], pos: Vec2, angle: f32) -> Vec<Vec2> {
    points.iter().map(|&p| rotate(p, -angle) + pos).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_line_is_two_triangles_of_given_width() {
        let v = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, WHITE);
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].pos(), Vec2::new(0.0, 1.0));
        assert_eq!(v[1].pos(), Vec2::new(0.0, -1.0));
        assert_eq!(v[5].pos(), Vec2::new(10.0, -1.0));
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        assert!(line(Vec2::ONE, Vec2::ONE, 1.0, WHITE).is_empty());
    }

    #[test]
    fn test_outline_closes_the_loop() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        assert_eq!(outline(&square, 0.5, WHITE).len(), 4 * 6);
        assert!(outline(&square[..1], 0.5, WHITE).is_empty());
    }

    #[test]
    fn test_polygon_fan() {
        let quad = [
            Vec2::new(-2.0, 0.0),
            Vec2::new(-2.0, 7.0),
            Vec2::new(2.0, 7.0),
            Vec2::new(2.0, 0.0),
        ];
        let v = polygon(&quad, WHITE);
        assert_eq!(v.len(), 6);
        assert!(v.iter().all(|v| v.color == WHITE));
    }

    #[test]
    fn test_flame_sits_behind_ship() {
        let flame = flame_outline(8);
        assert_eq!(flame.len(), 10);
        assert!(flame.iter().all(|p| p.y >= 10.0 - 1e-4));
    }

    #[test]
    fn test_to_world_translates() {
        let pts = to_world(&[Vec2::new(0.0, 20.0)], Vec2::new(100.0, 100.0), 0.0);
        assert_eq!(pts[0], Vec2::new(100.0, 120.0));
    }
}
