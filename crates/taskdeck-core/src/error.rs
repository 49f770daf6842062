//! Core error types for taskdeck-core.
//!
//! Configuration and malformed-input problems are errors and fail fast.
//! A task that cannot be fit before its deadline is *not* an error; it is
//! reported as an [`UnschedulableTask`](crate::schedule::UnschedulableTask).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for taskdeck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Working window is empty or inverted
    #[error("Invalid working hours: work_start_hour ({start}) must be less than work_end_hour ({end})")]
    InvalidWorkingHours { start: u32, end: u32 },

    /// Hour outside 0-23
    #[error("Hour out of range for '{field}': {value} (expected 0-23)")]
    HourOutOfRange { field: String, value: u32 },

    /// Invalid time range
    #[error("Invalid time range: end ({end}) must not be before start ({start})")]
    InvalidTimeRange {
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
    },

    /// Estimate is negative, non-finite or off the half-hour grid
    #[error("Invalid estimate for task '{task_id}': {message}")]
    InvalidEstimate { task_id: String, message: String },

    /// Calendar event that cannot be normalized
    #[error("Invalid calendar event '{event}': {message}")]
    InvalidEvent { event: String, message: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
