//! The player's ship

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Body, Shot, WorldBounds};
use crate::consts::*;
use crate::heading;

/// Control intent for one frame, sampled once by the input layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub thrust: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub shoot: bool,
}

/// The player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub lives: u32,
    pub score: u64,
    /// Remaining invulnerability (ms). While positive the ship is frozen.
    pub protection_timer: f32,
    /// Time since the last shot (ms)
    pub fire_timer: f32,
    /// Thrust was applied last frame (drives the engine flame)
    pub thrusting: bool,
    bounds: WorldBounds,
}

impl Player {
    /// Ship at the world centre with full lives and protection
    pub fn new(bounds: WorldBounds) -> Self {
        Self::at(bounds.center(), bounds)
    }

    pub fn at(pos: Vec2, bounds: WorldBounds) -> Self {
        Self {
            body: Body::new(pos, Vec2::ZERO, 0.0, PLAYER_RADIUS).with_outline(ship_outline()),
            lives: PLAYER_LIVES,
            score: 0,
            protection_timer: PROTECTION_TIMEOUT,
            fire_timer: 0.0,
            thrusting: false,
            bounds,
        }
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    pub fn is_protected(&self) -> bool {
        self.protection_timer > 0.0
    }

    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// Back to the centre, stationary, with protection re-armed
    pub fn reset(&mut self) {
        self.protection_timer = PROTECTION_TIMEOUT;
        self.body.pos = self.bounds.center();
        self.body.vel = Vec2::ZERO;
        self.body.angle = 0.0;
        self.thrusting = false;
        self.body.refresh_vertices();
    }

    /// Lose a life and respawn
    pub fn hit(&mut self) {
        if self.lives > 0 {
            self.lives -= 1;
            self.reset();
        }
    }

    pub fn add_points(&mut self, points: u32) {
        self.score += u64::from(points);
    }

    /// Advance one frame of `dt` milliseconds.
    ///
    /// Returns a new shot when the fire button is held and the cooldown has
    /// elapsed. Steering and thrust are per frame, not scaled by `dt`.
    pub fn update(&mut self, input: &PlayerInput, dt: f32) -> Option<Shot> {
        if self.protection_timer > 0.0 {
            self.protection_timer -= dt;
            return None;
        }
        self.protection_timer = 0.0;

        self.fire_timer += dt;
        let shot = if input.shoot && self.fire_timer > SHOT_COOLDOWN {
            self.fire_timer = 0.0;
            Some(Shot::new(self.body.pos, self.body.angle))
        } else {
            None
        };

        if input.steer_left {
            self.body.angle += STEER_RATE;
        }
        if input.steer_right {
            self.body.angle -= STEER_RATE;
        }

        self.thrusting = input.thrust;
        if input.thrust {
            // Ship velocity points along travel, unlike drifting bodies
            let vel = self.body.vel - heading(self.body.angle);
            self.body.vel = vel.clamp(
                Vec2::splat(-PLAYER_MAX_VELOCITY),
                Vec2::splat(PLAYER_MAX_VELOCITY),
            );
        }

        self.body.pos = self.bounds.wrap(self.body.pos + self.body.vel);
        self.body.refresh_vertices();

        shot
    }
}

/// Arrowhead ship outline (nose toward -y)
pub fn ship_outline() -> Vec<Vec2> {
    vec![
        Vec2::new(0.0, -10.0),
        Vec2::new(-10.0, 10.0),
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 10.0),
    ]
}
