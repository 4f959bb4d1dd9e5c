//! Sky Force - A vertical-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, progression)
//! - `session`: Frame driver that owns the simulation and talks to collaborators
//! - `platform`: Collaborator contracts (input, rendering, audio)
//! - `tuning`: Data-driven game balance
//! - `highscores` / `profile` / `settings`: LocalStorage-backed persistence

pub mod error;
pub mod highscores;
pub mod platform;
pub mod profile;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{CollaboratorError, ConfigError};
pub use highscores::{HighScores, Leaderboard};
pub use profile::Profile;
pub use session::Session;
pub use settings::{DifficultyMode, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed to the simulation (ms). A backgrounded tab can
    /// resume with a multi-second gap; anything above this is dropped.
    pub const MAX_FRAME_DT_MS: f32 = 100.0;

    /// Seed used when the host doesn't provide one
    pub const DEFAULT_SEED: u64 = 0x5EED_F0CE;
}
