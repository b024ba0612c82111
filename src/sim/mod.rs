//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module draws or plays
//! sound directly:
//! - Randomness comes through [`RandomSource`]
//! - Sound cues go to an injected [`AudioSink`](crate::audio::AudioSink)
//! - Rendering reads state through the `renderer` module

pub mod asteroid;
pub mod collision;
pub mod manager;
pub mod player;
pub mod state;
pub mod tick;
pub mod vector;

pub use asteroid::{Asteroid, AsteroidSize, child_angles};
pub use collision::{
    Collider, bodies_overlap, circles_overlap, collision_normal, exchange_velocities,
    polygons_overlap, seam_pairs, separate, sort_by_x, sweep_cross, sweep_pairs,
    wrapped_circles_overlap,
};
pub use manager::EntityManager;
pub use player::{Player, PlayerInput};
pub use state::{Body, GameEvent, RandomSource, ScriptedRandom, Shot, WorldBounds, seeded_rng};
pub use tick::{FrameInput, GamePhase, Session, generate_field};
pub use vector::Projection;
