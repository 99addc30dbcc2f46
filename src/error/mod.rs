//! Error handling module for Revid

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for Revid operations
#[derive(Error, Debug)]
pub enum RevidError {
    /// Transform engine binary could not be spawned at all.
    /// This is the one fatal condition: the batch cannot continue without it.
    #[error("Transform engine not found: {path}")]
    EngineMissing { path: String },

    /// Engine ran but exited with a failure status
    #[error("Transform engine failed for '{filename}': {detail}")]
    TransformFailed { filename: String, detail: String },

    /// Engine exceeded the configured time budget
    #[error("Transform engine timed out after {seconds}s for '{filename}'")]
    TransformTimeout { filename: String, seconds: u64 },

    /// Input validation error
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Output staging or delivery error
    #[error("Failed to stage output: {message}")]
    Staging { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DomainError> for RevidError {
    fn from(err: DomainError) -> Self {
        RevidError::Validation {
            message: err.to_string(),
        }
    }
}

/// Result type alias for Revid operations
pub type RevidResult<T> = std::result::Result<T, RevidError>;
