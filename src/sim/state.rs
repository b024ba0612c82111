//! World and shared entity state
//!
//! Kinematic state common to every moving entity, plus the shot entity and
//! the per-frame event record.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::asteroid::AsteroidSize;
use super::vector::rotate;
use crate::consts::*;
use crate::{heading, wrap_axis};

/// Fixed rectangular world; positions wrap toroidally
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::new(WORLD_WIDTH, WORLD_HEIGHT)
    }
}

impl WorldBounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Wrap each axis independently into `[0, dimension)`
    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        Vec2::new(wrap_axis(pos.x, self.width), wrap_axis(pos.y, self.height))
    }

    /// True if `pos` lies within the world grown by `tolerance` on every side
    pub fn contains(&self, pos: Vec2, tolerance: f32) -> bool {
        pos.x + tolerance >= 0.0
            && pos.y + tolerance >= 0.0
            && pos.x - tolerance <= self.width
            && pos.y - tolerance <= self.height
    }

    /// Shortest displacement from `from` to `to` on the wrapped world
    pub fn offset(&self, from: Vec2, to: Vec2) -> Vec2 {
        let mut d = to - from;
        if d.x > self.width / 2.0 {
            d.x -= self.width;
        } else if d.x < -self.width / 2.0 {
            d.x += self.width;
        }
        if d.y > self.height / 2.0 {
            d.y -= self.height;
        } else if d.y < -self.height / 2.0 {
            d.y += self.height;
        }
        d
    }

    /// True if `pos` is a wrapped world coordinate
    pub fn holds(&self, pos: Vec2) -> bool {
        (0.0..self.width).contains(&pos.x) && (0.0..self.height).contains(&pos.y)
    }
}

/// Kinematic state shared by the ship, asteroids and shots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    /// Stored as the negative of the travel direction; see [`Body::drift`]
    pub vel: Vec2,
    /// Orientation (radians), independent of the velocity heading
    pub angle: f32,
    /// Bounding-circle radius
    pub radius: f32,
    pub alive: bool,
    /// Polygon corners relative to `pos`, before rotation
    outline: Vec<Vec2>,
    /// `outline` rotated by `-angle` and translated to `pos`
    pub vertices: Vec<Vec2>,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, angle: f32, radius: f32) -> Self {
        Self {
            pos,
            vel,
            angle,
            radius,
            alive: true,
            outline: Vec::new(),
            vertices: Vec::new(),
        }
    }

    /// Attach a local-frame outline and compute its world vertices
    pub fn with_outline(mut self, outline: Vec<Vec2>) -> Self {
        self.outline = outline;
        self.refresh_vertices();
        self
    }

    /// True if the body carries a polygon usable by the separating-axis test
    pub fn has_polygon(&self) -> bool {
        self.vertices.len() >= 3
    }

    pub fn refresh_vertices(&mut self) {
        let (pos, angle) = (self.pos, self.angle);
        self.vertices.clear();
        self.vertices
            .extend(self.outline.iter().map(|&p| rotate(p, -angle) + pos));
    }

    /// Advance one frame: `pos -= vel`, then wrap into the world.
    ///
    /// Dead bodies do not move.
    pub fn drift(&mut self, bounds: &WorldBounds) {
        if !self.alive {
            return;
        }
        self.pos = bounds.wrap(self.pos - self.vel);
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

/// A projectile fired by the player.
///
/// Shots never wrap; they live until they leave the world or hit something.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
    pub body: Body,
}

impl Shot {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        let outline = vec![
            Vec2::new(-2.0, 0.0),
            Vec2::new(-2.0, 7.0),
            Vec2::new(2.0, 7.0),
            Vec2::new(2.0, 0.0),
        ];
        Self {
            body: Body::new(pos, heading(angle) * SHOT_SPEED, angle, SHOT_RADIUS)
                .with_outline(outline),
        }
    }

    pub fn update(&mut self) {
        if !self.body.alive {
            return;
        }
        self.body.pos -= self.body.vel;
        self.body.refresh_vertices();
    }
}

/// Something that happened during a frame, for HUD/score/effects collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player fired a shot
    ShotFired,
    /// Two asteroids bounced off each other
    AsteroidsCollided,
    /// A shot struck an asteroid
    AsteroidHit {
        size: AsteroidSize,
        destroyed: bool,
        /// Points awarded (0 unless destroyed)
        points: u32,
        /// Fragments spawned
        children: usize,
    },
    /// Player ran into an asteroid
    PlayerHit { lives_left: u32 },
    /// Player has no lives left
    GameOver,
    /// Field was cleared and a new one generated
    LevelCleared { next_level: u32 },
}

/// Source of uniform randomness in `[0, 1)`.
///
/// The simulation only ever asks for uniform samples, so tests can replace
/// the generator with a scripted sequence.
pub trait RandomSource {
    fn uniform(&mut self) -> f32;
}

impl RandomSource for Pcg32 {
    fn uniform(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Seeded generator used by sessions
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    samples: Vec<f32>,
    next: usize,
}

impl ScriptedRandom {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples, next: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let value = self.samples[self.next % self.samples.len()];
        self.next += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bounds_contains_with_tolerance() {
        let bounds = WorldBounds::new(800.0, 600.0);
        assert!(bounds.contains(Vec2::new(-9.0, 300.0), CULL_TOLERANCE));
        assert!(!bounds.contains(Vec2::new(-11.0, 300.0), CULL_TOLERANCE));
        assert!(bounds.contains(Vec2::new(805.0, 605.0), CULL_TOLERANCE));
        assert!(!bounds.contains(Vec2::new(400.0, 611.0), CULL_TOLERANCE));
    }

    #[test]
    fn test_offset_takes_short_way_round() {
        let bounds = WorldBounds::new(800.0, 600.0);
        let cases = [
            ((795.0, 300.0), (5.0, 300.0), (10.0, 0.0)),
            ((5.0, 5.0), (795.0, 595.0), (-10.0, -10.0)),
            ((100.0, 100.0), (150.0, 80.0), (50.0, -20.0)),
        ];
        for (from, to, expected) in cases {
            let d = bounds.offset(Vec2::from(from), Vec2::from(to));
            assert_eq!(d, Vec2::from(expected));
        }
    }

    #[test]
    fn test_dead_body_does_not_move() {
        let bounds = WorldBounds::default();
        let mut body = Body::new(Vec2::new(10.0, 10.0), Vec2::new(1.0, 1.0), 0.0, 5.0);
        body.kill();
        body.drift(&bounds);
        assert_eq!(body.pos, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_drift_subtracts_velocity_and_wraps() {
        let bounds = WorldBounds::new(100.0, 100.0);
        let mut body = Body::new(Vec2::new(1.0, 50.0), Vec2::new(3.0, -2.0), 0.0, 5.0);
        body.drift(&bounds);
        assert_eq!(body.pos, Vec2::new(98.0, 52.0));
    }

    #[test]
    fn test_vertices_follow_position_and_angle() {
        let body = Body::new(Vec2::new(50.0, 50.0), Vec2::ZERO, std::f32::consts::FRAC_PI_2, 1.0)
            .with_outline(vec![Vec2::new(0.0, 1.0)]);
        // Rotating (0, 1) by -90° gives (1, 0)
        assert!((body.vertices[0] - Vec2::new(51.0, 50.0)).length() < 1e-5);
    }

    #[test]
    fn test_shot_moves_along_heading() {
        let mut shot = Shot::new(Vec2::new(100.0, 100.0), 0.0);
        shot.update();
        assert!((shot.body.pos - Vec2::new(100.0, 95.0)).length() < 1e-5);
        assert_eq!(shot.body.vertices.len(), 4);
    }

    #[test]
    fn test_shot_does_not_wrap() {
        let mut shot = Shot::new(Vec2::new(100.0, 2.0), 0.0);
        shot.update();
        assert!(shot.body.pos.y < 0.0);
    }

    #[test]
    fn test_scripted_random_cycles() {
        let mut rng = ScriptedRandom::new(vec![0.25, 0.75]);
        assert_eq!(rng.uniform(), 0.25);
        assert_eq!(rng.uniform(), 0.75);
        assert_eq!(rng.uniform(), 0.25);
    }

    #[test]
    fn test_seeded_rng_in_unit_range() {
        let mut rng = seeded_rng(7);
        for _ in 0..1000 {
            let v = rng.uniform();
            assert!((0.0..1.0).contains(&v));
        }
    }

    proptest! {
        #[test]
        fn prop_drift_stays_in_world(
            x in 0.0f32..800.0,
            y in 0.0f32..600.0,
            vx in -399.0f32..399.0,
            vy in -299.0f32..299.0,
        ) {
            let bounds = WorldBounds::new(800.0, 600.0);
            let mut body = Body::new(Vec2::new(x, y), Vec2::new(vx, vy), 0.0, 10.0);
            body.drift(&bounds);
            prop_assert!(bounds.holds(body.pos), "escaped world: {:?}", body.pos);
        }
    }
}
