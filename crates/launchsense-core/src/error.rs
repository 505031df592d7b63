//! Core error types for launchsense-core.
//!
//! This module defines the error hierarchy using thiserror. Generation
//! errors never reach the renderer: the updater catches them and degrades
//! to a fallback state.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for launchsense-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// UI-state generation errors
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Updater task errors
    #[error("Updater error: {0}")]
    Updater(#[from] UpdaterError),

    /// Unknown routine name
    #[error(transparent)]
    Routine(#[from] ParseRoutineError),

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

/// Errors raised while turning predictions and a catalog into a `UiState`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Confidence is NaN or outside [0, 1]
    #[error("Invalid confidence {value} for action '{action}'")]
    InvalidConfidence { action: String, value: f64 },

    /// App entry without a package id
    #[error("App '{display_name}' has an empty package id")]
    MissingPackageId { display_name: String },

    /// App entry without a display name
    #[error("App '{package_id}' has an empty display name")]
    MissingDisplayName { package_id: String },
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

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Config directory could not be created
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(#[from] std::io::Error),
}

/// Errors surfaced by the updater service handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdaterError {
    /// The update task has stopped and no longer accepts commands
    #[error("Updater task is closed")]
    Closed,

    /// The update task dropped a reply channel before answering
    #[error("Updater task did not respond")]
    NoResponse,
}

/// Unknown routine name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown routine '{0}' (expected morning, afternoon, evening, weekend or custom)")]
pub struct ParseRoutineError(pub String);

/// Unknown semantic bucket name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown bucket '{0}' (expected wellness, productivity, communication, entertainment, social or general)")]
pub struct ParseBucketError(pub String);

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for UpdaterError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        UpdaterError::Closed
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for UpdaterError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        UpdaterError::NoResponse
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
