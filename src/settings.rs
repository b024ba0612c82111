//! Session settings
//!
//! Fixed for the lifetime of a session. Loaded from a JSON file when one is
//! given, otherwise defaults are used.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::WorldBounds;

/// Precise test used for asteroid-vs-asteroid candidate pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NarrowPhase {
    /// Bounding circles only
    Circle,
    /// Separating-axis test on the asteroid outlines
    #[default]
    Polygon,
}

impl NarrowPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            NarrowPhase::Circle => "Circle",
            NarrowPhase::Polygon => "Polygon",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "circle" => Some(NarrowPhase::Circle),
            "polygon" | "sat" => Some(NarrowPhase::Polygon),
            _ => None,
        }
    }
}

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// World width in units
    pub world_width: f32,
    /// World height in units
    pub world_height: f32,

    // === Simulation ===
    /// Narrow phase used between asteroids
    pub narrow_phase: NarrowPhase,
    /// Frame deltas longer than this are clamped (ms)
    pub max_frame_ms: f32,
    /// Seed for spawn positions and fragmentation
    pub seed: u64,
    /// Level the first asteroid field is generated for
    pub starting_level: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Start muted
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,

            narrow_phase: NarrowPhase::default(),
            max_frame_ms: MAX_FRAME_MS,
            seed: 0x5eed,
            starting_level: 1,

            master_volume: 0.5,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// World bounds described by these settings
    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.world_width, self.world_height)
    }

    /// Parse and validate settings from JSON. Missing keys use defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {e}");
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.world_width > 0.0) {
            return Err(SettingsError::Invalid {
                field: "world_width",
                reason: "must be positive",
            });
        }
        if !(self.world_height > 0.0) {
            return Err(SettingsError::Invalid {
                field: "world_height",
                reason: "must be positive",
            });
        }
        if !(self.max_frame_ms > 0.0) {
            return Err(SettingsError::Invalid {
                field: "max_frame_ms",
                reason: "must be positive",
            });
        }
        if !(0.0..=1.0).contains(&self.master_volume) {
            return Err(SettingsError::Invalid {
                field: "master_volume",
                reason: "must be within 0.0 - 1.0",
            });
        }
        if !(0.0..=1.0).contains(&self.sfx_volume) {
            return Err(SettingsError::Invalid {
                field: "sfx_volume",
                reason: "must be within 0.0 - 1.0",
            });
        }
        Ok(())
    }
}
