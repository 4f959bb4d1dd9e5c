//! Distance leaderboard
//!
//! Persisted to LocalStorage, keeps each pilot's best flight and the top 10
//! overall.

use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;

/// Maximum number of entries to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub username: String,
    /// Best distance flown (m)
    pub distance: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Where finished runs get reported. Failures are advisory; the session logs
/// and moves on.
pub trait Leaderboard {
    /// Record a finished run. Returns the pilot's rank (1-indexed) if they are
    /// on the board afterward.
    fn submit(
        &mut self,
        username: &str,
        distance: u64,
        timestamp: f64,
    ) -> Result<Option<usize>, CollaboratorError>;

    /// Current top entries, best first
    fn top(&self) -> Result<Vec<HighScoreEntry>, CollaboratorError>;
}

/// Local leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sky_force_leaderboard";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Best recorded distance for `username`
    pub fn best_for(&self, username: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.username == username)
            .map(|e| e.distance)
    }

    /// Rank of `username` on the board (1-indexed)
    pub fn rank_of(&self, username: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.username == username)
            .map(|i| i + 1)
    }

    /// Check if a distance would change the board for this pilot
    pub fn qualifies(&self, username: &str, distance: u64) -> bool {
        if distance == 0 {
            return false;
        }
        if let Some(best) = self.best_for(username) {
            return distance > best;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if distance beats the lowest entry
        self.entries
            .last()
            .map(|e| distance > e.distance)
            .unwrap_or(true)
    }

    /// Record a run. One entry per pilot, replaced only by a longer flight.
    /// Returns the rank achieved (1-indexed) or None if the board didn't change.
    pub fn add_distance(&mut self, username: &str, distance: u64, timestamp: f64) -> Option<usize> {
        if !self.qualifies(username, distance) {
            return None;
        }

        self.entries.retain(|e| e.username != username);
        let entry = HighScoreEntry {
            username: username.to_string(),
            distance,
            timestamp,
        };

        // Find insertion point (sorted descending by distance)
        let pos = self.entries.iter().position(|e| distance > e.distance);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest flight on the board (if any)
    pub fn top_distance(&self) -> Option<u64> {
        self.entries.first().map(|e| e.distance)
    }

    /// Load the leaderboard from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} leaderboard entries", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No leaderboard found, starting fresh");
        Self::new()
    }

    /// Save the leaderboard to LocalStorage (WASM only)
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
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), CollaboratorError> {
        // No-op for native
        Ok(())
    }
}

impl Leaderboard for HighScores {
    fn submit(
        &mut self,
        username: &str,
        distance: u64,
        timestamp: f64,
    ) -> Result<Option<usize>, CollaboratorError> {
        if self.add_distance(username, distance, timestamp).is_some() {
            self.save()?;
        }
        Ok(self.rank_of(username))
    }

    fn top(&self) -> Result<Vec<HighScoreEntry>, CollaboratorError> {
        Ok(self.entries.clone())
    }
}

/// Wall-clock Unix time (ms) for stamping entries
#[cfg(target_arch = "wasm32")]
pub fn timestamp_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn timestamp_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
