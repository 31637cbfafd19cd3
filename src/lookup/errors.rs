//! Key parsing errors

use thiserror::Error;

/// Result type for key parsing
pub type KeyResult<T> = Result<T, KeyError>;

/// Errors raised while parsing a filter key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Key does not match `name[__[!]lookup]`
    #[error("Lookup key `{0}` is of invalid format. It must be `name[__[!]lookup]`.")]
    InvalidFormat(String),

    /// Lookup is unknown or not whitelisted
    #[error("Unsupported lookup type - `{0}`.")]
    UnsupportedLookup(String),
}
