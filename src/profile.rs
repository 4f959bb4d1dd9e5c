//! Pilot profile
//!
//! Username and personal best distance, persisted to LocalStorage. The
//! simulation only reads the personal best; the session records new ones
//! when a run ends.

use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;

/// Name used until the player picks one
pub const DEFAULT_USERNAME: &str = "PILOT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub username: String,
    /// Longest flight (m)
    pub personal_best: u64,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            personal_best: 0,
        }
    }
}

impl Profile {
    pub fn new(username: impl Into<String>) -> Self {
        let mut profile = Self::default();
        profile.set_username(username);
        profile
    }

    /// Trimmed; blank names fall back to the default
    pub fn set_username(&mut self, username: impl Into<String>) {
        let name = username.into();
        let name = name.trim();
        self.username = if name.is_empty() {
            DEFAULT_USERNAME.to_string()
        } else {
            name.to_string()
        };
    }

    /// Record a finished run. Returns true if it set a new personal best.
    pub fn record_distance(&mut self, distance: u64) -> bool {
        if distance > self.personal_best {
            self.personal_best = distance;
            true
        } else {
            false
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sky_force_profile";

    /// Load the profile from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(profile) = serde_json::from_str::<Profile>(&json) {
                    log::info!("Loaded profile for {}", profile.username);
                    return profile;
                }
            }
        }

        log::info!("No profile found, using defaults");
        Self::default()
    }

    /// Save the profile to LocalStorage (WASM only)
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
            .map_err(|_| CollaboratorError::Storage("quota exceeded".to_string()))?;
        log::info!("Profile saved");
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), CollaboratorError> {
        // No-op for native
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_username_falls_back() {
        assert_eq!(Profile::new("   ").username, DEFAULT_USERNAME);
        assert_eq!(Profile::new(" maverick ").username, "maverick");
    }

    #[test]
    fn test_personal_best_only_grows() {
        let mut profile = Profile::default();
        assert!(profile.record_distance(420));
        assert!(!profile.record_distance(300));
        assert!(!profile.record_distance(420));
        assert_eq!(profile.personal_best, 420);
    }
}
