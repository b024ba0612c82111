//! Asteroid Field entry point
//!
//! Runs a headless session with an autopilot and reports the outcome.
//!
//! Usage: `asteroid-field [settings.json] [--frames N]`

use std::path::PathBuf;

use asteroid_field::renderer::VertexBatch;
use asteroid_field::sim::{FrameInput, GameEvent, GamePhase, PlayerInput, Session};
use asteroid_field::{AudioManager, Settings};
use clap::Parser;

/// Nominal frame length (ms)
const FRAME_MS: f32 = 1000.0 / 60.0;

const DEFAULT_FRAMES: u64 = 60 * 60;

#[derive(Parser, Debug)]
#[command(name = "asteroid-field")]
#[command(about = "Headless asteroid field run driven by a simple autopilot")]
struct Cli {
    /// Settings JSON file; defaults are used when omitted or unreadable
    settings: Option<PathBuf>,
    /// Frames to simulate unless the game ends first
    #[arg(long, default_value_t = DEFAULT_FRAMES)]
    frames: u64,
}

/// Circle slowly and fire continuously, with short bursts of thrust
fn autopilot(frame: u64) -> FrameInput {
    FrameInput {
        player: PlayerInput {
            thrust: frame % 240 < 20,
            steer_left: frame % 3 == 0,
            steer_right: false,
            shoot: true,
        },
        pause: false,
    }
}

fn main() {
    let cli = Cli::parse();
    env_logger::init();
    log::info!("Asteroid Field (headless) starting...");

    let settings = match &cli.settings {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let frames = cli.frames;

    log::info!(
        "World {}x{}, narrow phase {}, seed {}",
        settings.world_width,
        settings.world_height,
        settings.narrow_phase.as_str(),
        settings.seed
    );

    let audio = AudioManager::from_settings(&settings);
    let mut session = Session::new(settings, audio);
    let mut batch = VertexBatch::new();

    let mut destroyed = 0u32;
    for frame in 0..frames {
        let events = session.tick(&autopilot(frame), FRAME_MS);
        destroyed += events
            .iter()
            .filter(|e| matches!(e, GameEvent::AsteroidHit { destroyed: true, .. }))
            .count() as u32;

        batch.clear();
        session.render(&mut batch);

        if session.phase() == GamePhase::GameOver {
            break;
        }
    }

    let player = session.manager().player();
    log::info!(
        "Finished after {} frames: level {}, score {}, lives {}, {} asteroids destroyed",
        session.frame(),
        session.level(),
        player.score,
        player.lives,
        destroyed
    );
    log::debug!("Last frame: {} vertices", batch.vertex_count());

    println!(
        "level {} score {} lives {}",
        session.level(),
        player.score,
        player.lives
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["asteroid-field"]).unwrap();
        assert!(cli.settings.is_none());
        assert_eq!(cli.frames, DEFAULT_FRAMES);
    }

    #[test]
    fn test_cli_settings_and_frames() {
        let cli = Cli::try_parse_from(["asteroid-field", "field.json", "--frames", "120"]).unwrap();
        assert_eq!(cli.settings, Some(PathBuf::from("field.json")));
        assert_eq!(cli.frames, 120);
    }

    #[test]
    fn test_cli_rejects_bad_frame_count() {
        assert!(Cli::try_parse_from(["asteroid-field", "--frames", "abc"]).is_err());
        assert!(Cli::try_parse_from(["asteroid-field", "field.json", "abc"]).is_err());
    }

    #[test]
    fn test_autopilot_always_fires() {
        assert!((0..500).all(|f| autopilot(f).player.shoot));
        assert!(autopilot(0).player.thrust);
        assert!(!autopilot(100).player.thrust);
    }
}
