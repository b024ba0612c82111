//! Rendering module
//!
//! The simulation never draws. Entities are tessellated into [`Vertex`]
//! triangle lists and handed to a [`Surface`], which a backend implements.
//! [`VertexBatch`] is the CPU-side surface used by headless runs and tests.

pub mod shapes;
pub mod vertex;

use glam::Vec2;

pub use vertex::{Vertex, colors};

use crate::audio::AudioSink;
use crate::sim::{Asteroid, EntityManager, GamePhase, Player, Session, Shot};

/// Stroke width for outlines, in world units
pub const LINE_WIDTH: f32 = 1.0;

/// Segments used for the half circle of the engine flame
const FLAME_SEGMENTS: u32 = 8;

/// Drawing target
pub trait Surface {
    /// Triangles forming a stroked outline
    fn stroke(&mut self, vertices: &[Vertex]);
    /// Triangles forming a filled shape
    fn fill(&mut self, vertices: &[Vertex]);
    /// A text label with its baseline starting at `pos`
    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: [f32; 4]);
}

/// Something that can draw itself onto a [`Surface`]
pub trait Renderable {
    fn render(&self, surface: &mut dyn Surface);
}

impl Renderable for Player {
    fn render(&self, surface: &mut dyn Surface) {
        let bounds = self.bounds();

        if self.is_protected() {
            let seconds = (self.protection_timer / 1000.0).ceil() as u32;
            let pos = Vec2::new(bounds.width / 2.0 - 15.0, bounds.height / 2.0);
            surface.text(&seconds.to_string(), pos, 48.0, colors::HUD);
        }

        surface.text(&format!("Lives: {}", self.lives), Vec2::new(10.0, 20.0), 16.0, colors::HUD);
        surface.text(&format!("Score: {}", self.score), Vec2::new(10.0, 40.0), 16.0, colors::HUD);

        surface.stroke(&shapes::outline(&self.body.vertices, LINE_WIDTH, colors::SHIP));

        if self.thrusting {
            let flame = shapes::to_world(
                &shapes::flame_outline(FLAME_SEGMENTS),
                self.body.pos,
                self.body.angle,
            );
            surface.stroke(&shapes::outline(&flame, LINE_WIDTH, colors::FLAME));
        }
    }
}

impl Renderable for Shot {
    fn render(&self, surface: &mut dyn Surface) {
        if !self.body.alive {
            return;
        }
        surface.fill(&shapes::polygon(&self.body.vertices, colors::SHOT));
    }
}

impl Renderable for Asteroid {
    fn render(&self, surface: &mut dyn Surface) {
        if !self.is_alive() {
            return;
        }
        let color = if self.impacted {
            colors::ASTEROID_IMPACT
        } else {
            colors::ASTEROID
        };
        surface.stroke(&shapes::outline(&self.body.vertices, LINE_WIDTH, color));
    }
}

impl<A: AudioSink> EntityManager<A> {
    /// Draw the state left by the last update
    pub fn render(&self, surface: &mut dyn Surface) {
        self.player().render(surface);
        for shot in self.shots() {
            shot.render(surface);
        }
        for asteroid in self.asteroids() {
            asteroid.render(surface);
        }
    }
}

impl<A: AudioSink> Session<A> {
    /// Draw the field plus a banner when not playing
    pub fn render(&self, surface: &mut dyn Surface) {
        self.manager().render(surface);

        let banner = match self.phase() {
            GamePhase::Playing => return,
            GamePhase::Paused => "PAUSED",
            GamePhase::GameOver => "GAME OVER",
        };
        let center = self.manager().bounds().center();
        surface.text(banner, center + Vec2::new(-60.0, 60.0), 32.0, colors::HUD);
    }
}

/// A text label recorded by [`VertexBatch`]
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub pos: Vec2,
    pub size: f32,
    pub color: [f32; 4],
}

/// Collects one frame of geometry in CPU buffers
#[derive(Debug, Clone, Default)]
pub struct VertexBatch {
    pub strokes: Vec<Vertex>,
    pub fills: Vec<Vertex>,
    pub labels: Vec<Label>,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for the next frame, keeping allocations
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.fills.clear();
        self.labels.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.strokes.len() + self.fills.len()
    }

    /// Stroke vertices as raw bytes for upload
    pub fn stroke_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.strokes)
    }

    /// Fill vertices as raw bytes for upload
    pub fn fill_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.fills)
    }
}

impl Surface for VertexBatch {
    fn stroke(&mut self, vertices: &[Vertex]) {
        self.strokes.extend_from_slice(vertices);
    }

    fn fill(&mut self, vertices: &[Vertex]) {
        self.fills.extend_from_slice(vertices);
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: [f32; 4]) {
        self.labels.push(Label {
            text: text.to_string(),
            pos,
            size,
            color,
        });
    }
}
