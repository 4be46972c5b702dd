//! Player preferences
//!
//! Kept separate from `Tuning`: these never change gameplay outcomes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute everything
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (skip fade transitions and siren flashing)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let raw = fs::read_to_string(path).map_err(|e| GameError::io(path, e))?;
        let mut settings: Settings =
            serde_json::from_str(&raw).map_err(|e| GameError::parse(path, e))?;
        settings.clamp_volumes();
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    fn clamp_volumes(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
    }

    /// Effective sound-effect volume
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music volume
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Whether scene transitions play the fade
    pub fn effective_fade(&self) -> bool {
        !self.reduced_motion
    }
}
