//! # Configuration Errors
//!
//! Raised while loading configuration or building definitions. All of them
//! are fatal: a service must not start with a broken filter declaration.

use thiserror::Error;

use crate::model::ModelError;

/// Result type for configuration and definition building
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A field must be resolved but the definition has no model
    #[error("Filter '{filter}' refers to field '{field}' but no model is configured")]
    NoModel { filter: String, field: String },

    /// Field name not present on the model
    #[error("Model '{model}' has no field '{field}'")]
    UnknownField { model: String, field: String },

    /// Resource refers to a model that is not registered
    #[error("Resource '{resource}' refers to unknown model '{model}'")]
    UnknownModel { resource: String, model: String },

    /// Parent resource missing or declared later
    #[error("Resource '{resource}' extends '{parent}', which is not declared before it")]
    UnknownParent { resource: String, parent: String },

    #[error("Resource '{0}' is declared more than once")]
    DuplicateResource(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Configuration file could not be read
    #[error("Failed to read config '{path}': {reason}")]
    Io { path: String, reason: String },

    /// Configuration file is not valid JSON for the expected layout
    #[error("Invalid config JSON '{path}': {reason}")]
    Malformed { path: String, reason: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ConfigError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::NoModel { .. } => "URLFILTER_CONFIG_NO_MODEL",
            ConfigError::UnknownField { .. } => "URLFILTER_CONFIG_UNKNOWN_FIELD",
            ConfigError::UnknownModel { .. } => "URLFILTER_CONFIG_UNKNOWN_MODEL",
            ConfigError::UnknownParent { .. } => "URLFILTER_CONFIG_UNKNOWN_PARENT",
            ConfigError::DuplicateResource(_) => "URLFILTER_CONFIG_DUPLICATE_RESOURCE",
            ConfigError::Invalid(_) => "URLFILTER_CONFIG_INVALID",
            ConfigError::Io { .. } => "URLFILTER_CONFIG_IO",
            ConfigError::Malformed { .. } => "URLFILTER_CONFIG_MALFORMED",
            ConfigError::Model(_) => "URLFILTER_MODEL_ERROR",
        }
    }

    /// Configuration errors always abort startup
    pub fn is_fatal(&self) -> bool {
        true
    }
}
