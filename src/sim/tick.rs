//! Session driver
//!
//! Wraps an [`EntityManager`] with the outer game loop: pause, frame delta
//! clamping, level progression and game over. A fresh field is generated
//! whenever the previous one is cleared or the player loses a life.

use std::f32::consts::TAU;

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::asteroid::{Asteroid, AsteroidSize};
use super::manager::EntityManager;
use super::player::{Player, PlayerInput};
use super::state::{GameEvent, RandomSource, WorldBounds, seeded_rng};
use crate::audio::AudioSink;
use crate::settings::Settings;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal gameplay
    Playing,
    /// Frozen; rendering still shows the last frame
    Paused,
    /// No lives left
    GameOver,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub player: PlayerInput,
    /// Pause toggle
    pub pause: bool,
}

/// One run of the game, from the first field to game over
pub struct Session<A: AudioSink> {
    manager: EntityManager<A>,
    settings: Settings,
    rng: Pcg32,
    level: u32,
    phase: GamePhase,
    frame: u64,
    /// Lives at the end of the previous frame
    last_lives: u32,
}

impl<A: AudioSink> Session<A> {
    /// Start a session and generate the first field
    pub fn new(settings: Settings, audio: A) -> Self {
        let bounds = settings.bounds();
        let manager = EntityManager::new(bounds, settings.narrow_phase, audio);
        let rng = seeded_rng(settings.seed);
        let level = settings.starting_level;
        let last_lives = manager.player().lives;

        let mut session = Self {
            manager,
            settings,
            rng,
            level,
            phase: GamePhase::Playing,
            frame: 0,
            last_lives,
        };
        session.spawn_field();
        session
    }

    pub fn manager(&self) -> &EntityManager<A> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut EntityManager<A> {
        &mut self.manager
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Frames simulated so far (paused frames excluded)
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// End the session and hand back the audio collaborator
    pub fn into_audio(self) -> A {
        self.manager.into_audio()
    }

    /// Advance by one frame of `dt` milliseconds
    pub fn tick(&mut self, input: &FrameInput, dt: f32) -> Vec<GameEvent> {
        // Handle pause toggle
        if input.pause {
            match self.phase {
                GamePhase::Playing => {
                    self.phase = GamePhase::Paused;
                    log::debug!("Paused at frame {}", self.frame);
                    return Vec::new();
                }
                GamePhase::Paused => {
                    self.phase = GamePhase::Playing;
                    log::debug!("Resumed at frame {}", self.frame);
                }
                GamePhase::GameOver => {}
            }
        }

        if self.phase != GamePhase::Playing {
            return Vec::new();
        }

        // A stalled frame must not teleport anything
        let dt = dt.clamp(0.0, self.settings.max_frame_ms);
        let mut events = self.manager.update(dt, &input.player, &mut self.rng);
        self.frame += 1;

        if events.contains(&GameEvent::GameOver) {
            self.phase = GamePhase::GameOver;
            log::info!(
                "Game over on level {} with {} points",
                self.level,
                self.manager.player().score
            );
            return events;
        }

        let lives = self.manager.player().lives;
        if lives < self.last_lives {
            // The ship was already re-centred by the hit
            self.last_lives = lives;
            self.manager.clear_shots();
            self.spawn_field();
            log::info!("Life lost, {} left; field regenerated for level {}", lives, self.level);
        } else if self.manager.live_asteroids() == 0 {
            self.level += 1;
            self.manager.clear_shots();
            self.manager.player_mut().reset();
            self.spawn_field();
            events.push(GameEvent::LevelCleared {
                next_level: self.level,
            });
        }

        events
    }

    /// Start over from the configured level with a fresh ship
    pub fn restart(&mut self) {
        let bounds = *self.manager.bounds();
        self.manager.add_player(Player::new(bounds));
        self.last_lives = self.manager.player().lives;
        self.manager.clear_shots();
        self.level = self.settings.starting_level;
        self.phase = GamePhase::Playing;
        self.spawn_field();
        log::info!("Restarted at level {}", self.level);
    }

    fn spawn_field(&mut self) {
        let bounds = *self.manager.bounds();
        self.manager.clear_asteroids();
        for asteroid in generate_field(self.level, &mut self.rng, &bounds) {
            self.manager.add_asteroid(asteroid);
        }
    }
}

/// Asteroid counts per size for a level
pub fn field_counts(level: u32) -> [(AsteroidSize, u32); 3] {
    [
        (AsteroidSize::Large, 4 + level / 4),
        (AsteroidSize::Medium, 3 + level / 3),
        (AsteroidSize::Small, 3 + level / 2),
    ]
}

/// Generate the asteroid field for a level at random positions and headings
pub fn generate_field<R: RandomSource + ?Sized>(
    level: u32,
    rng: &mut R,
    bounds: &WorldBounds,
) -> Vec<Asteroid> {
    let mut field = Vec::new();
    for (size, count) in field_counts(level) {
        for _ in 0..count {
            let pos = bounds.wrap(Vec2::new(
                rng.uniform() * bounds.width,
                rng.uniform() * bounds.height,
            ));
            let angle = rng.uniform() * TAU;
            field.push(Asteroid::new(size, pos, angle));
        }
    }

    log::info!("Level {}: generated {} asteroids", level, field.len());
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::consts::*;
    use crate::sim::state::ScriptedRandom;

    fn session() -> Session<RecordingAudio> {
        Session::new(Settings::default(), RecordingAudio::default())
    }

    fn count(field: &[Asteroid], size: AsteroidSize) -> usize {
        field.iter().filter(|a| a.size == size).count()
    }

    #[test]
    fn test_field_counts_grow_with_level() {
        let bounds = WorldBounds::default();
        let mut rng = ScriptedRandom::new(vec![0.1, 0.5, 0.9]);

        let field = generate_field(1, &mut rng, &bounds);
        assert_eq!(count(&field, AsteroidSize::Large), 4);
        assert_eq!(count(&field, AsteroidSize::Medium), 3);
        assert_eq!(count(&field, AsteroidSize::Small), 3);

        let field = generate_field(6, &mut rng, &bounds);
        assert_eq!(count(&field, AsteroidSize::Large), 5);
        assert_eq!(count(&field, AsteroidSize::Medium), 5);
        assert_eq!(count(&field, AsteroidSize::Small), 6);
        assert!(field.iter().all(|a| bounds.holds(a.body.pos)));
    }

    #[test]
    fn test_new_session_spawns_first_field() {
        let s = session();
        assert_eq!(s.level(), 1);
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.manager().live_asteroids(), 10);
    }

    #[test]
    fn test_pause_freezes_state() {
        let mut s = session();
        let before: Vec<Vec2> = s.manager().asteroids().iter().map(|a| a.body.pos).collect();

        let pause = FrameInput {
            pause: true,
            ..Default::default()
        };
        assert!(s.tick(&pause, 16.0).is_empty());
        assert_eq!(s.phase(), GamePhase::Paused);
        for _ in 0..5 {
            s.tick(&FrameInput::default(), 16.0);
        }
        let after: Vec<Vec2> = s.manager().asteroids().iter().map(|a| a.body.pos).collect();
        assert_eq!(before, after);
        assert_eq!(s.frame(), 0);

        // Unpausing runs the same frame
        s.tick(&pause, 16.0);
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.frame(), 1);
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        let mut s = session();
        s.tick(&FrameInput::default(), 10_000.0);
        assert_eq!(
            s.manager().player().protection_timer,
            PROTECTION_TIMEOUT - MAX_FRAME_MS
        );
        s.tick(&FrameInput::default(), -50.0);
        assert_eq!(
            s.manager().player().protection_timer,
            PROTECTION_TIMEOUT - MAX_FRAME_MS
        );
    }

    #[test]
    fn test_cleared_field_advances_level() {
        let mut s = session();
        s.manager_mut().clear_asteroids();
        s.manager_mut().player_mut().protection_timer = 0.0;
        s.manager_mut().player_mut().score = 70;

        let events = s.tick(&FrameInput::default(), 16.0);
        assert!(events.contains(&GameEvent::LevelCleared { next_level: 2 }));
        assert_eq!(s.level(), 2);
        // Level 2: 4 large, 3 medium, 4 small
        assert_eq!(s.manager().live_asteroids(), 11);
        assert!(s.manager().player().is_protected());
        assert_eq!(s.manager().player().score, 70);
    }

    #[test]
    fn test_losing_life_regenerates_field() {
        let mut s = session();
        s.manager_mut().clear_asteroids();
        let center = s.manager().bounds().center();
        let mut rock = Asteroid::new(AsteroidSize::Small, center + Vec2::new(5.0, 0.0), 0.0);
        rock.body.vel = Vec2::ZERO;
        s.manager_mut().add_asteroid(rock);
        s.manager_mut().player_mut().protection_timer = 0.0;
        s.manager_mut().add_shot(crate::sim::Shot::new(Vec2::new(50.0, 50.0), 0.0));

        let events = s.tick(&FrameInput::default(), 16.0);
        assert!(events.contains(&GameEvent::PlayerHit { lives_left: 2 }));
        assert_eq!(s.level(), 1);
        assert_eq!(s.manager().live_asteroids(), 10);
        assert!(s.manager().shots().is_empty());
        assert!(s.manager().player().is_protected());

        // No further regeneration while lives hold steady
        let before: Vec<Vec2> = s.manager().asteroids().iter().map(|a| a.body.pos).collect();
        s.tick(&FrameInput::default(), 16.0);
        assert_eq!(s.manager().asteroids().len(), before.len());
    }

    #[test]
    fn test_game_over_stops_updates() {
        let mut s = session();
        s.manager_mut().clear_asteroids();
        let center = s.manager().bounds().center();
        let mut rock = Asteroid::new(AsteroidSize::Large, center + Vec2::new(5.0, 0.0), 0.0);
        rock.body.vel = Vec2::ZERO;
        s.manager_mut().add_asteroid(rock);
        let player = s.manager_mut().player_mut();
        player.lives = 1;
        player.protection_timer = 0.0;

        let events = s.tick(&FrameInput::default(), 16.0);
        assert!(events.contains(&GameEvent::GameOver));
        assert_eq!(s.phase(), GamePhase::GameOver);

        let frame = s.frame();
        assert!(s.tick(&FrameInput::default(), 16.0).is_empty());
        assert_eq!(s.frame(), frame);

        s.restart();
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.level(), 1);
        assert_eq!(s.manager().player().lives, PLAYER_LIVES);
        assert_eq!(s.manager().live_asteroids(), 10);
    }

    #[test]
    fn test_same_seed_same_run() {
        let input = FrameInput {
            player: PlayerInput {
                thrust: true,
                steer_left: true,
                shoot: true,
                ..Default::default()
            },
            pause: false,
        };
        let run = || {
            let mut s = session();
            for _ in 0..400 {
                s.tick(&input, 16.0);
            }
            let positions: Vec<Vec2> = s.manager().asteroids().iter().map(|a| a.body.pos).collect();
            (positions, s.manager().player().score, s.level())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_different_seed_different_field() {
        let a = session();
        let b = Session::new(
            Settings {
                seed: 99,
                ..Default::default()
            },
            RecordingAudio::default(),
        );
        let pos = |s: &Session<RecordingAudio>| s.manager().asteroids()[0].body.pos;
        assert_ne!(pos(&a), pos(&b));
    }
}
