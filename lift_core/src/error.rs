//! Error types for the lift_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// A rejected quick entry.
///
/// Every variant is user-facing: the `Display` output is meant to be shown
/// to the person who typed the line, unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Entry is empty")]
    EmptyInput,

    #[error("Malformed entry: {0}")]
    MalformedEntry(String),

    #[error("Invalid weight: {0}")]
    InvalidWeight(String),

    #[error("Invalid sets/reps '{token}': {reason}")]
    InvalidSetsReps { token: String, reason: String },

    #[error("Exercise with shortcut '{0}' not found")]
    ExerciseNotFound(String),
}

impl ParseError {
    /// Stable name of the error kind, suitable for logs and machine output
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::EmptyInput => "empty_input",
            ParseError::MalformedEntry(_) => "malformed_entry",
            ParseError::InvalidWeight(_) => "invalid_weight",
            ParseError::InvalidSetsReps { .. } => "invalid_sets_reps",
            ParseError::ExerciseNotFound(_) => "exercise_not_found",
        }
    }
}

/// Core error type for lift_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Set or workout store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Quick entry was rejected
    #[error(transparent)]
    Parse(#[from] ParseError),
}
