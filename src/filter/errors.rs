//! # Filter Errors
//!
//! Errors raised while resolving request parameters against filters.
//! Everything except `UnresolvedField` is a client error and rejects the
//! request; none of them are retried.

use thiserror::Error;

/// Result type for filter resolution
pub type FilterResult<T> = Result<T, FilterError>;

/// Severity of a filter error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
    /// Server-side defect
    Internal,
}

/// Per-request filter errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Raw key does not follow `name[__[!]lookup]`
    #[error("{key}: Lookup key `{raw}` is of invalid format. It must be `name[__[!]lookup]`.")]
    KeyFormat { key: String, raw: String },

    /// Lookup unknown or not allowed for this filter
    #[error("{key}: Unsupported lookup type - `{lookup}`.")]
    UnsupportedLookup { key: String, lookup: String },

    /// Raw value rejected by the resolved validator
    #[error("{key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Filter still refers to its field by name only
    #[error("{key}: field '{field}' was never resolved against a model")]
    UnresolvedField { key: String, field: String },
}

impl FilterError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::KeyFormat { .. } => "URLFILTER_KEY_FORMAT",
            FilterError::UnsupportedLookup { .. } => "URLFILTER_UNSUPPORTED_LOOKUP",
            FilterError::InvalidValue { .. } => "URLFILTER_INVALID_VALUE",
            FilterError::UnresolvedField { .. } => "URLFILTER_UNRESOLVED_FIELD",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            FilterError::UnresolvedField { .. } => Severity::Internal,
            _ => Severity::Reject,
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self.severity() {
            Severity::Reject => 400,
            Severity::Internal => 500,
        }
    }

    /// Key of the filter that raised the error
    pub fn key(&self) -> &str {
        match self {
            FilterError::KeyFormat { key, .. }
            | FilterError::UnsupportedLookup { key, .. }
            | FilterError::InvalidValue { key, .. }
            | FilterError::UnresolvedField { key, .. } => key,
        }
    }
}
