//! Domain-specific error types for mindmesh

use thiserror::Error;

/// Main error type for everything outside the completion path.
///
/// Completion failures never surface here: they are rendered to text by
/// [`crate::clients::CompletionOutcome`] so that a session can always finish.
#[derive(Error, Debug)]
pub enum MindMeshError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<anyhow::Error> for MindMeshError {
    fn from(err: anyhow::Error) -> Self {
        MindMeshError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for MindMeshError {
    fn from(err: serde_json::Error) -> Self {
        MindMeshError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MindMeshError {
    fn from(err: toml::de::Error) -> Self {
        MindMeshError::Config {
            message: format!("Invalid TOML: {}", err),
        }
    }
}

impl From<std::io::Error> for MindMeshError {
    fn from(err: std::io::Error) -> Self {
        MindMeshError::Storage {
            message: err.to_string(),
        }
    }
}

/// Result type alias for mindmesh operations
pub type Result<T> = std::result::Result<T, MindMeshError>;
