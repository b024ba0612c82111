//! Sound cues
//!
//! The simulation only says which cue to play; how (or whether) it is heard
//! is up to the [`AudioSink`] handed to the entity manager.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player fired a shot
    Fire,
    /// Player ship was hit
    Hit,
    /// Two asteroids bounced
    Collision,
    /// Asteroid destroyed
    Explosion,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 4] = [
        SoundEffect::Fire,
        SoundEffect::Hit,
        SoundEffect::Collision,
        SoundEffect::Explosion,
    ];

    /// Relative loudness of each cue
    pub fn base_gain(&self) -> f32 {
        match self {
            SoundEffect::Fire => 0.5,
            SoundEffect::Hit => 0.8,
            SoundEffect::Collision => 0.3,
            SoundEffect::Explosion => 0.7,
        }
    }
}

/// Fire-and-forget sound output
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

impl<T: AudioSink + ?Sized> AudioSink for Box<T> {
    fn play(&mut self, effect: SoundEffect) {
        (**self).play(effect);
    }
}

/// Audio manager for a session
///
/// Applies volume and mute, then forwards audible cues to an output
/// callback. Without an output it only logs.
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    output: Option<Box<dyn FnMut(SoundEffect, f32)>>,
    /// Cues played since creation, indexed like [`SoundEffect::ALL`]
    counts: [u32; 4],
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("muted", &self.muted)
            .field("has_output", &self.output.is_some())
            .field("counts", &self.counts)
            .finish()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.5,
            sfx_volume: 1.0,
            muted: false,
            output: None,
            counts: [0; 4],
        }
    }

    /// Build from session settings
    pub fn from_settings(settings: &crate::Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Route audible cues to a playback backend
    pub fn with_output(mut self, output: impl FnMut(SoundEffect, f32) + 'static) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// How many times `effect` was requested
    pub fn count(&self, effect: SoundEffect) -> u32 {
        SoundEffect::ALL
            .iter()
            .position(|e| *e == effect)
            .map(|i| self.counts[i])
            .unwrap_or(0)
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        if let Some(i) = SoundEffect::ALL.iter().position(|e| *e == effect) {
            self.counts[i] += 1;
        }

        let vol = self.effective_volume() * effect.base_gain();
        if vol <= 0.0 {
            return;
        }

        log::debug!("Sound {effect:?} at volume {vol:.2}");
        if let Some(output) = self.output.as_mut() {
            output(effect, vol);
        }
    }
}

/// Keeps every cue in order; for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    pub played: Vec<SoundEffect>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.played.push(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_counts_every_request() {
        let mut audio = AudioManager::new();
        audio.play(SoundEffect::Fire);
        audio.play(SoundEffect::Fire);
        audio.set_muted(true);
        audio.play(SoundEffect::Explosion);
        assert_eq!(audio.count(SoundEffect::Fire), 2);
        assert_eq!(audio.count(SoundEffect::Explosion), 1);
        assert_eq!(audio.count(SoundEffect::Hit), 0);
    }

    #[test]
    fn test_output_receives_scaled_volume() {
        let heard = Rc::new(RefCell::new(Vec::new()));
        let sink = heard.clone();
        let mut audio = AudioManager::new().with_output(move |e, v| sink.borrow_mut().push((e, v)));
        audio.set_master_volume(1.0);
        audio.set_sfx_volume(0.5);
        audio.play(SoundEffect::Hit);

        let heard = heard.borrow();
        assert_eq!(heard.len(), 1);
        assert_eq!(heard[0].0, SoundEffect::Hit);
        assert!((heard[0].1 - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_muted_output_is_silent() {
        let heard = Rc::new(RefCell::new(0));
        let sink = heard.clone();
        let mut audio = AudioManager::new().with_output(move |_, _| *sink.borrow_mut() += 1);
        audio.set_muted(true);
        audio.play(SoundEffect::Fire);
        assert_eq!(*heard.borrow(), 0);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
    }

    #[test]
    fn test_from_settings() {
        let settings = crate::Settings {
            muted: true,
            ..Default::default()
        };
        assert!(AudioManager::from_settings(&settings).is_muted());
    }

    #[test]
    fn test_boxed_sink_forwards() {
        let mut boxed: Box<RecordingAudio> = Box::default();
        boxed.play(SoundEffect::Collision);
        assert_eq!(boxed.played, vec![SoundEffect::Collision]);
    }
}
