//! Error types
//!
//! Configuration errors are fatal and surface from constructors. Collaborator
//! errors are advisory: the session logs and drops them.

use std::fmt;

/// Invalid balance data or unreadable configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidTuning { field: &'static str, reason: String },
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTuning { field, reason } => {
                write!(f, "invalid tuning value `{field}`: {reason}")
            }
            Self::Parse(msg) => write!(f, "failed to parse tuning: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Failure reported by an advisory collaborator (audio, leaderboard, storage)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    Audio(String),
    Leaderboard(String),
    Storage(String),
}

impl fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio(msg) => write!(f, "audio unavailable: {msg}"),
            Self::Leaderboard(msg) => write!(f, "leaderboard request failed: {msg}"),
            Self::Storage(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for CollaboratorError {}
