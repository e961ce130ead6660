//! Core error types for flowcue-core.
//!
//! Only [`ValidationError::InvalidDuration`] ever reaches a timer caller.
//! Audio failures are represented by [`CueError`] but are absorbed inside the
//! cue emitters; the one public path that returns them is WAV export.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for flowcue-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Audio cue errors
    #[error("Cue error: {0}")]
    Cue(#[from] CueError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Work duration must be a positive number of seconds
    #[error("Invalid duration: {secs} seconds (must be greater than zero)")]
    InvalidDuration { secs: i64 },

    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown or missing configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Audio cue errors.
#[derive(Error, Debug)]
pub enum CueError {
    /// No audio output device available
    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Failed to play the cue
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// Failed to write a rendered cue to disk
    #[error("Failed to export cue to {path}: {message}")]
    ExportFailed { path: PathBuf, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_duration_message_names_the_value() {
        let err = ValidationError::InvalidDuration { secs: 0 };
        assert_eq!(
            err.to_string(),
            "Invalid duration: 0 seconds (must be greater than zero)"
        );
    }

    #[test]
    fn validation_error_converts_into_core_error() {
        let err: CoreError = ValidationError::InvalidDuration { secs: -4 }.into();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidDuration { secs: -4 })
        ));
    }
}
