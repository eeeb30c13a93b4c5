//! Playback backends. The director only talks to this trait, so the game
//! runs (silently) when no output device is available.

use crate::sound::Sound;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("sound {0:?} is not loaded")]
    NotLoaded(Sound),
    #[error("playback of {sound:?} was refused: {reason}")]
    Refused { sound: Sound, reason: String },
}

/// Minimal playback surface: start from zero, pause, volume, rate.
pub trait AudioBackend {
    /// Start `sound` from its beginning at `volume`, restarting it if it
    /// is already playing.
    fn play(&mut self, sound: Sound, volume: f64, looping: bool) -> Result<(), AudioError>;

    fn pause(&mut self, sound: Sound);

    fn set_volume(&mut self, sound: Sound, volume: f64);

    fn set_playback_rate(&mut self, sound: Sound, rate: f64);

    fn set_master_volume(&mut self, _volume: f64) {}

    /// Stop everything and release playback resources.
    fn stop_all(&mut self);
}

/// Backend that accepts every command and produces no sound.
#[derive(Debug, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn play(&mut self, _sound: Sound, _volume: f64, _looping: bool) -> Result<(), AudioError> {
        Ok(())
    }

    fn pause(&mut self, _sound: Sound) {}

    fn set_volume(&mut self, _sound: Sound, _volume: f64) {}

    fn set_playback_rate(&mut self, _sound: Sound, _rate: f64) {}

    fn stop_all(&mut self) {}
}
