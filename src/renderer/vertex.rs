//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn at(p: Vec2, color: [f32; 4]) -> Self {
        Self::new(p.x, p.y, color)
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::from(self.position)
    }
}

/// Colors for game elements
pub mod colors {
    pub const SHIP: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const FLAME: [f32; 4] = [1.0, 0.647, 0.0, 1.0];
    /// #3fdbff
    pub const SHOT: [f32; 4] = [0.247, 0.859, 1.0, 1.0];
    /// #C90018
    pub const ASTEROID: [f32; 4] = [0.788, 0.0, 0.094, 1.0];
    /// Asteroid that bounced this frame
    pub const ASTEROID_IMPACT: [f32; 4] = [1.0, 0.85, 0.3, 1.0];
    pub const HUD: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
