//! Game settings and preferences
//!
//! Persisted separately from the profile in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;

/// Baseline enemy multipliers applied before tier scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeMultipliers {
    pub health: f32,
    pub damage: f32,
    pub spawn_rate: f32,
}

/// Difficulty preset chosen before a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyMode {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyMode::Easy => "Easy",
            DifficultyMode::Normal => "Normal",
            DifficultyMode::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyMode::Easy),
            "normal" | "norm" => Some(DifficultyMode::Normal),
            "hard" => Some(DifficultyMode::Hard),
            _ => None,
        }
    }

    /// Tier 1 multipliers for this mode
    pub fn base_multipliers(&self) -> ModeMultipliers {
        match self {
            DifficultyMode::Easy => ModeMultipliers {
                health: 0.7,
                damage: 0.7,
                spawn_rate: 0.8,
            },
            DifficultyMode::Normal => ModeMultipliers {
                health: 1.0,
                damage: 1.0,
                spawn_rate: 1.0,
            },
            DifficultyMode::Hard => ModeMultipliers {
                health: 1.3,
                damage: 1.3,
                spawn_rate: 1.2,
            },
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty applied to the next run
    pub difficulty: DifficultyMode,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: DifficultyMode::Normal,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Effective sfx gain (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sky_force_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), CollaboratorError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| CollaboratorError::Storage("LocalStorage unavailable".to_string()))?;

        let json = serde_json::to_string(self)
            .map_err(|e| CollaboratorError::Storage(e.to_string()))?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| CollaboratorError::Storage("settings not written".to_string()))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), CollaboratorError> {
        Ok(())
    }
}
