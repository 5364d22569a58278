// Central Error Type for the Application

use thiserror::Error;

use crate::domain::InvocationFailure;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// No candidate executable could be resolved. Non-fatal: the feature stays
    /// disabled until configuration changes.
    #[error("Executable not found: {0}")]
    NotFound(String),

    #[error("Invocation failed: {0}")]
    Invocation(#[from] InvocationFailure),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Failure detail when the error came from a child process
    pub fn invocation(&self) -> Option<&InvocationFailure> {
        match self {
            AppError::Invocation(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
