//! Asteroids and fragmentation
//!
//! Sizes form a chain Large -> Medium -> Small. Each size carries its own
//! constants; movement, spin and splitting are shared.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Body, RandomSource, WorldBounds};
use crate::{heading, normalize_angle};

/// Asteroid size variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    pub const ALL: [AsteroidSize; 3] = [AsteroidSize::Large, AsteroidSize::Medium, AsteroidSize::Small];

    /// Bounding-circle radius
    pub fn radius(self) -> f32 {
        match self {
            AsteroidSize::Large => 20.0,
            AsteroidSize::Medium => 15.0,
            AsteroidSize::Small => 10.0,
        }
    }

    /// Units travelled per frame
    pub fn speed(self) -> f32 {
        match self {
            AsteroidSize::Large => 1.5,
            AsteroidSize::Medium => 1.1,
            AsteroidSize::Small => 0.7,
        }
    }

    /// Cosmetic rotation per frame (radians)
    pub fn spin(self) -> f32 {
        match self {
            AsteroidSize::Large => -0.08,
            AsteroidSize::Medium => 0.02,
            AsteroidSize::Small => -0.009,
        }
    }

    /// Shots needed to break it
    pub fn lives(self) -> u8 {
        match self {
            AsteroidSize::Large => 3,
            AsteroidSize::Medium => 2,
            AsteroidSize::Small => 1,
        }
    }

    /// Score for destroying it
    pub fn points(self) -> u32 {
        match self {
            AsteroidSize::Large => 20,
            AsteroidSize::Medium => 50,
            AsteroidSize::Small => 100,
        }
    }

    /// Size of the fragments it breaks into
    pub fn child(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }

    /// Corner count of the outline polygon
    pub fn sides(self) -> usize {
        match self {
            AsteroidSize::Large => 10,
            AsteroidSize::Medium => 8,
            AsteroidSize::Small => 6,
        }
    }

    /// Regular convex outline inscribed in the bounding circle
    pub fn outline(self) -> Vec<Vec2> {
        let n = self.sides();
        let r = self.radius();
        (0..n)
            .map(|i| {
                let theta = i as f32 / n as f32 * TAU;
                Vec2::new(r * theta.cos(), r * theta.sin())
            })
            .collect()
    }
}

/// An asteroid entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub body: Body,
    pub size: AsteroidSize,
    /// Remaining hits before it breaks
    pub lives: u8,
    /// Touched another asteroid this frame (render colour cue only)
    pub impacted: bool,
}

impl Asteroid {
    /// Spawn an asteroid heading along `angle`
    pub fn new(size: AsteroidSize, pos: Vec2, angle: f32) -> Self {
        let body = Body::new(pos, heading(angle) * size.speed(), angle, size.radius())
            .with_outline(size.outline());
        Self {
            body,
            size,
            lives: size.lives(),
            impacted: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.body.alive
    }

    /// Move, wrap and spin one frame
    pub fn update(&mut self, bounds: &WorldBounds) {
        if !self.body.alive {
            return;
        }
        self.body.drift(bounds);
        self.body.angle = normalize_angle(self.body.angle + self.size.spin());
        self.body.refresh_vertices();
    }

    /// Take one hit.
    ///
    /// Returns the fragments to add to the field once the last life is gone;
    /// the asteroid itself is then dead. The caller owns inserting the
    /// fragments, which must not happen while it is iterating the field.
    pub fn hit<R: RandomSource + ?Sized>(&mut self, rng: &mut R, bounds: &WorldBounds) -> Vec<Asteroid> {
        if !self.body.alive {
            return Vec::new();
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives > 0 {
            return Vec::new();
        }

        self.body.kill();

        let Some(child) = self.size.child() else {
            return Vec::new();
        };

        // 2 or 3 fragments
        let count = 2 + ((rng.uniform() * 2.0) as usize).min(1);
        let origin = self.body.pos;

        let fragments: Vec<Asteroid> = child_angles(self.body.angle, count)
            .into_iter()
            .map(|angle| {
                let pos = bounds.wrap(origin + heading(angle) * child.radius());
                Asteroid::new(child, pos, angle)
            })
            .collect();

        log::debug!(
            "{:?} asteroid at ({:.0}, {:.0}) split into {} {:?}",
            self.size,
            origin.x,
            origin.y,
            fragments.len(),
            child
        );

        fragments
    }
}

/// Fragment headings: successive quarter turns subtracted from the parent heading
pub fn child_angles(parent_angle: f32, count: usize) -> Vec<f32> {
    let base = normalize_angle(parent_angle);
    (1..=count)
        .map(|k| normalize_angle(base - k as f32 * FRAC_PI_2))
        .collect()
}
