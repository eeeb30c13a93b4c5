//! Game configuration (window, input, audio, dialog). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Start in fullscreen.
    #[serde(default)]
    pub fullscreen: bool,
    /// Mouse sensitivity multiplier (1.0 = default).
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Master volume, 0.0 to 1.0.
    #[serde(default = "default_master_volume")]
    pub master_volume: f64,
    /// Dialog reveal speed in characters per second.
    #[serde(default = "default_typewriter_cps")]
    pub typewriter_cps: f32,
    /// Directory holding `models/` and `sounds/`.
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_sensitivity() -> f32 {
    1.0
}
fn default_master_volume() -> f64 {
    1.0
}
fn default_typewriter_cps() -> f32 {
    100.0
}
fn default_asset_dir() -> PathBuf {
    PathBuf::from("assets")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            fullscreen: false,
            sensitivity: default_sensitivity(),
            master_volume: default_master_volume(),
            typewriter_cps: default_typewriter_cps(),
            asset_dir: default_asset_dir(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(data) => Self::parse(&data).unwrap_or_else(|e| {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str::<Self>(data).map(Self::sanitized)
    }

    fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        if !(self.typewriter_cps > 0.0) {
            log::warn!("typewriter_cps must be positive, using {}", default_typewriter_cps());
            self.typewriter_cps = default_typewriter_cps();
        }
        if !(self.sensitivity > 0.0) {
            self.sensitivity = default_sensitivity();
        }
        self
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
