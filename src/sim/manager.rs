//! Entity manager
//!
//! Owns the ship, the shots and the asteroid field, and runs one frame in a
//! fixed order:
//!
//! 1. cull dead and off-world shots/asteroids
//! 2. sort asteroids and shots by x
//! 3. collide: player-asteroid, asteroid-asteroid, shot-asteroid
//! 4. merge fragments spawned during step 3
//! 5. advance the player, then shots, then asteroids
//!
//! Rendering only reads the state left by the last update.

use super::asteroid::Asteroid;
use super::collision::{
    bodies_overlap, circles_overlap, collision_normal, exchange_velocities, pair_mut, seam_pairs,
    separate, sort_by_x, sweep_cross, sweep_pairs, wrapped_circles_overlap,
};
use super::player::{Player, PlayerInput};
use super::state::{GameEvent, RandomSource, Shot, WorldBounds};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;
use crate::settings::NarrowPhase;

/// Orchestrates per-frame simulation of all entities
pub struct EntityManager<A: AudioSink> {
    bounds: WorldBounds,
    narrow_phase: NarrowPhase,
    player: Player,
    shots: Vec<Shot>,
    asteroids: Vec<Asteroid>,
    /// Fragments produced during the collision passes
    pending: Vec<Asteroid>,
    audio: A,
}

impl<A: AudioSink> EntityManager<A> {
    /// Empty field with a fresh player at the world centre
    pub fn new(bounds: WorldBounds, narrow_phase: NarrowPhase, audio: A) -> Self {
        Self {
            bounds,
            narrow_phase,
            player: Player::new(bounds),
            shots: Vec::new(),
            asteroids: Vec::new(),
            pending: Vec::new(),
            audio,
        }
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// End the session and hand back the audio collaborator
    pub fn into_audio(self) -> A {
        self.audio
    }

    /// Replace the player
    pub fn add_player(&mut self, player: Player) {
        self.player = player;
    }

    pub fn add_shot(&mut self, shot: Shot) {
        self.shots.push(shot);
    }

    pub fn add_asteroid(&mut self, asteroid: Asteroid) {
        self.asteroids.push(asteroid);
    }

    pub fn clear_asteroids(&mut self) {
        self.asteroids.clear();
    }

    pub fn clear_shots(&mut self) {
        self.shots.clear();
    }

    /// Asteroids still in play
    pub fn live_asteroids(&self) -> usize {
        self.asteroids.iter().filter(|a| a.is_alive()).count()
    }

    /// Run one frame of `dt` milliseconds and report what happened
    pub fn update<R: RandomSource + ?Sized>(
        &mut self,
        dt: f32,
        input: &PlayerInput,
        rng: &mut R,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();

        self.cull();

        sort_by_x(&mut self.asteroids);
        sort_by_x(&mut self.shots);

        self.collide_player(&mut events);
        self.collide_asteroids(&mut events);
        self.collide_shots(rng, &mut events);

        self.asteroids.append(&mut self.pending);

        self.advance(dt, input, &mut events);

        events
    }

    /// Drop dead entities and anything that has left the world
    fn cull(&mut self) {
        let bounds = self.bounds;
        self.shots
            .retain(|s| s.body.alive && bounds.contains(s.body.pos, CULL_TOLERANCE));
        self.asteroids
            .retain(|a| a.body.alive && bounds.contains(a.body.pos, CULL_TOLERANCE));
    }

    fn collide_player(&mut self, events: &mut Vec<GameEvent>) {
        if self.player.is_protected() || self.player.is_game_over() {
            return;
        }

        let (player, bounds) = (&self.player.body, &self.bounds);
        let hit = self
            .asteroids
            .iter()
            .any(|a| a.is_alive() && wrapped_circles_overlap(player, &a.body, bounds));
        if !hit {
            return;
        }

        self.player.hit();
        self.audio.play(SoundEffect::Hit);
        log::debug!("Player hit, {} lives left", self.player.lives);
        events.push(GameEvent::PlayerHit {
            lives_left: self.player.lives,
        });
        if self.player.is_game_over() {
            log::info!("Game over, final score {}", self.player.score);
            events.push(GameEvent::GameOver);
        }
    }

    fn collide_asteroids(&mut self, events: &mut Vec<GameEvent>) {
        for asteroid in &mut self.asteroids {
            asteroid.impacted = false;
        }

        let mut candidates = sweep_pairs(&self.asteroids);
        candidates.extend(seam_pairs(&self.asteroids, self.bounds.width));

        for (i, j) in candidates {
            let (a, b) = pair_mut(&mut self.asteroids, i, j);
            if !bodies_overlap(&a.body, &b.body, self.narrow_phase, &self.bounds) {
                continue;
            }

            let normal = collision_normal(&a.body, &b.body, &self.bounds);
            separate(&mut a.body, &mut b.body, normal, BOUNCE_MARGIN, &self.bounds);
            exchange_velocities(&mut a.body, &mut b.body, normal);
            a.impacted = true;
            b.impacted = true;

            self.audio.play(SoundEffect::Collision);
            events.push(GameEvent::AsteroidsCollided);
        }
    }

    fn collide_shots<R: RandomSource + ?Sized>(&mut self, rng: &mut R, events: &mut Vec<GameEvent>) {
        // Bounces may have nudged asteroids out of x order
        sort_by_x(&mut self.asteroids);

        for (s, a) in sweep_cross(&self.shots, &self.asteroids) {
            let shot = &mut self.shots[s];
            let asteroid = &mut self.asteroids[a];
            // Either may have been used up by an earlier pair this pass
            if !shot.body.alive || !asteroid.is_alive() {
                continue;
            }
            if !circles_overlap(&shot.body, &asteroid.body) {
                continue;
            }

            shot.body.kill();
            let fragments = asteroid.hit(rng, &self.bounds);
            let destroyed = !asteroid.is_alive();
            let size = asteroid.size;

            let points = if destroyed {
                self.player.add_points(size.points());
                self.audio.play(SoundEffect::Explosion);
                size.points()
            } else {
                0
            };

            events.push(GameEvent::AsteroidHit {
                size,
                destroyed,
                points,
                children: fragments.len(),
            });
            self.pending.extend(fragments);
        }
    }

    fn advance(&mut self, dt: f32, input: &PlayerInput, events: &mut Vec<GameEvent>) {
        if !self.player.is_game_over() {
            if let Some(shot) = self.player.update(input, dt) {
                self.shots.push(shot);
                self.audio.play(SoundEffect::Fire);
                events.push(GameEvent::ShotFired);
            }
        }

        for shot in &mut self.shots {
            shot.update();
        }
        for asteroid in &mut self.asteroids {
            asteroid.update(&self.bounds);
        }
    }
}
