//! Kira-backed playback.

use crate::backend::{AudioBackend, AudioError};
use crate::sound::Sound;
use anyhow::Result;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    tween::Tween,
};
use std::collections::HashMap;
use std::path::Path;

pub struct KiraBackend {
    manager: AudioManager,
    sounds: HashMap<Sound, StaticSoundData>,
    handles: HashMap<Sound, StaticSoundHandle>,
}

impl KiraBackend {
    /// Open the default output device and load every sound under
    /// `asset_dir`. A sound that fails to load is skipped with a warning.
    pub fn new(asset_dir: &Path) -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;
        let mut backend = Self {
            manager,
            sounds: HashMap::new(),
            handles: HashMap::new(),
        };
        for sound in Sound::all() {
            let path = asset_dir.join(sound.asset().path);
            if let Err(e) = backend.load_sound(sound, &path) {
                log::warn!("Failed to load {}: {}", path.display(), e);
            }
        }
        log::info!("Audio ready ({} sounds loaded)", backend.sounds.len());
        Ok(backend)
    }

    fn load_sound(&mut self, sound: Sound, path: &Path) -> Result<()> {
        // Click slots share one decoded buffer.
        if let Sound::Click(slot) = sound {
            if slot > 0 {
                if let Some(data) = self.sounds.get(&Sound::Click(0)).cloned() {
                    self.sounds.insert(sound, data);
                    return Ok(());
                }
            }
        }
        let sound_data = StaticSoundData::from_file(path)?;
        self.sounds.insert(sound, sound_data);
        Ok(())
    }
}

impl AudioBackend for KiraBackend {
    fn play(&mut self, sound: Sound, volume: f64, looping: bool) -> Result<(), AudioError> {
        let data = self
            .sounds
            .get(&sound)
            .cloned()
            .ok_or(AudioError::NotLoaded(sound))?;
        if let Some(mut previous) = self.handles.remove(&sound) {
            let _ = previous.stop(Tween::default());
        }
        let mut settings = StaticSoundSettings::new().volume(volume);
        if looping {
            settings = settings.loop_region(..);
        }
        let handle = self
            .manager
            .play(data.with_settings(settings))
            .map_err(|e| AudioError::Refused {
                sound,
                reason: e.to_string(),
            })?;
        self.handles.insert(sound, handle);
        Ok(())
    }

    fn pause(&mut self, sound: Sound) {
        if let Some(handle) = self.handles.get_mut(&sound) {
            let _ = handle.pause(Tween::default());
        }
    }

    fn set_volume(&mut self, sound: Sound, volume: f64) {
        if let Some(handle) = self.handles.get_mut(&sound) {
            let _ = handle.set_volume(volume, Tween::default());
        }
    }

    fn set_playback_rate(&mut self, sound: Sound, rate: f64) {
        if let Some(handle) = self.handles.get_mut(&sound) {
            let _ = handle.set_playback_rate(rate, Tween::default());
        }
    }

    fn set_master_volume(&mut self, volume: f64) {
        let _ = self.manager.main_track().set_volume(volume, Tween::default());
    }

    fn stop_all(&mut self) {
        for handle in self.handles.values_mut() {
            let _ = handle.stop(Tween::default());
        }
        self.handles.clear();
    }
}
