//! Audio boundary
//!
//! The simulation only emits [`GameEvent`]s. This module maps them to sound
//! cues and keeps the music state; actually producing sound is left to
//! whatever front end drains the cues.

use serde::{Deserialize, Serialize};

use crate::sim::{GameEvent, KillCause, PowerUpKind};

/// Index of the drum track in the background music
pub const DRUM_TRACK: usize = 1;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Power-up collected
    Prize,
    /// Enemy stomped
    Boop,
    /// Player died
    Death,
    /// Player fired
    Shot,
}

impl SoundEffect {
    pub fn asset_path(self) -> &'static str {
        match self {
            SoundEffect::Prize => "sounds/prize.wav",
            SoundEffect::Boop => "sounds/boop2.wav",
            SoundEffect::Death => "sounds/death_sound.wav",
            SoundEffect::Shot => "sounds/shot_sound.wav",
        }
    }
}

/// One sound to play, optionally through an echo filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub effect: SoundEffect,
    pub echo: bool,
    /// Playback volume (0.0 - 1.0)
    pub volume: f32,
}

/// Which sound, if any, an event makes
pub fn effect_for(event: &GameEvent) -> Option<(SoundEffect, bool)> {
    match *event {
        GameEvent::ShotFired => Some((SoundEffect::Shot, false)),
        GameEvent::EnemyKilled {
            cause: KillCause::Stomp,
            ..
        } => Some((SoundEffect::Boop, false)),
        GameEvent::PlayerDied => Some((SoundEffect::Death, false)),
        GameEvent::PowerUp(kind) => Some((SoundEffect::Prize, kind == PowerUpKind::Goal)),
        _ => None,
    }
}

/// Audio state for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    drums_muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    /// Drums start muted until the music power-up is found
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            drums_muted: true,
        }
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

    pub fn is_track_muted(&self, track: usize) -> bool {
        track == DRUM_TRACK && self.drums_muted
    }

    pub fn toggle_drums(&mut self) {
        self.drums_muted = !self.drums_muted;
        log::debug!(
            "Drum track {}",
            if self.drums_muted { "muted" } else { "unmuted" }
        );
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Consume a frame's events: update music state and collect the cues to play
    pub fn handle(&mut self, events: &[GameEvent]) -> Vec<Cue> {
        let volume = self.effective_volume();
        let mut cues = Vec::new();
        for event in events {
            if *event == GameEvent::TrackMuteToggle {
                self.toggle_drums();
            }
            if volume <= 0.0 {
                continue;
            }
            if let Some((effect, echo)) = effect_for(event) {
                cues.push(Cue {
                    effect,
                    echo,
                    volume,
                });
            }
        }
        cues
    }
}
