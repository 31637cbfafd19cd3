//! Model registry errors
//!
//! All model errors are raised at startup and are fatal for the
//! definitions that depend on them.

use thiserror::Error;

/// Result type for model registry operations
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A model with this name is already registered
    #[error("Model '{0}' is already registered")]
    DuplicateModel(String),

    /// Model file could not be read
    #[error("Failed to read '{path}': {reason}")]
    Io { path: String, reason: String },

    /// Model file or definition is invalid
    #[error("Malformed model '{path}': {reason}")]
    Malformed { path: String, reason: String },
}

impl ModelError {
    pub(crate) fn io(path: impl Into<String>, reason: impl ToString) -> Self {
        ModelError::Io {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed(path: impl Into<String>, reason: impl ToString) -> Self {
        ModelError::Malformed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
