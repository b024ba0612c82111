//! Asteroid Field - a wrap-around arcade simulation core
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, collisions, level flow)
//! - `renderer`: Drawing surface abstraction and shape tessellation
//! - `audio`: Sound cue collaborator
//! - `settings`: Session configuration

pub mod audio;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use audio::{AudioManager, AudioSink, SoundEffect};
pub use error::SettingsError;
pub use settings::{NarrowPhase, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// Time is measured in milliseconds. Velocities, steering and spin are
/// applied once per frame, not scaled by the frame delta.
pub mod consts {
    /// Default world dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Entities further than this outside the world are culled
    pub const CULL_TOLERANCE: f32 = 10.0;

    /// Player ship
    pub const PLAYER_RADIUS: f32 = 12.0;
    pub const PLAYER_LIVES: u32 = 3;
    /// Per-component velocity clamp
    pub const PLAYER_MAX_VELOCITY: f32 = 2.6;
    /// Invulnerability window after (re)spawn, ms
    pub const PROTECTION_TIMEOUT: f32 = 3000.0;
    /// Minimum time between shots, ms
    pub const SHOT_COOLDOWN: f32 = 1000.0 / 8.0;
    /// Heading change per frame while steering (radians)
    pub const STEER_RATE: f32 = 0.1;

    /// Projectiles
    pub const SHOT_RADIUS: f32 = 2.0;
    pub const SHOT_SPEED: f32 = 5.0;

    /// Extra separation added when pushing overlapping asteroids apart
    pub const BOUNCE_MARGIN: f32 = 1.0;

    /// Longest frame the session driver will simulate, ms
    pub const MAX_FRAME_MS: f32 = 100.0;
}

/// Wrap a coordinate into `[0, size)` with a single correction step.
///
/// Only valid while per-frame displacement stays below `size`.
#[inline]
pub fn wrap_axis(mut v: f32, size: f32) -> f32 {
    if v < 0.0 {
        v += size;
    }
    // -epsilon + size can round up to exactly size
    if v >= size {
        v -= size;
    }
    v
}

/// Normalized angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    angle.rem_euclid(std::f32::consts::TAU)
}

/// Unit vector for a heading, using the game's (sin, cos) convention.
///
/// Entities store velocity as `heading * speed` and move by subtracting it,
/// so a heading of 0 travels toward -y (up the screen).
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), angle.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_axis() {
        assert_eq!(wrap_axis(-5.0, 800.0), 795.0);
        assert_eq!(wrap_axis(805.0, 800.0), 5.0);
        assert_eq!(wrap_axis(800.0, 800.0), 0.0);
        assert_eq!(wrap_axis(42.0, 800.0), 42.0);
        assert!(wrap_axis(-1e-6, 800.0) < 800.0);
    }

    #[test]
    fn test_normalize_angle() {
        use std::f32::consts::{PI, TAU};
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_heading_convention() {
        let h = heading(0.0);
        assert!(h.x.abs() < 1e-6);
        assert!((h.y - 1.0).abs() < 1e-6);
    }
}
