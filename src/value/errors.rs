//! Value validation errors

use thiserror::Error;

/// Result type for value validation
pub type ValueResult<T> = Result<T, ValueError>;

/// Reasons a raw query-string value is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("This field is required.")]
    Required,

    #[error("Ensure this value has at most {max} characters (it has {actual}).")]
    TooLong { max: usize, actual: usize },

    #[error("Enter a whole number.")]
    InvalidInteger,

    #[error("Enter a number.")]
    InvalidNumber,

    #[error("Ensure this value is greater than or equal to {0}.")]
    BelowMinimum(i64),

    #[error("Ensure this value is less than or equal to {0}.")]
    AboveMaximum(i64),

    #[error("Enter a valid boolean.")]
    InvalidBoolean,

    #[error("Enter a valid date.")]
    InvalidDate,

    #[error("Enter a valid date/time.")]
    InvalidDateTime,

    #[error("Enter a valid time.")]
    InvalidTime,

    #[error("Enter a valid email address.")]
    InvalidEmail,

    #[error("Enter a valid slug consisting of letters, numbers, underscores or hyphens.")]
    InvalidSlug,

    #[error("Enter a valid URL.")]
    InvalidUrl,

    #[error("Ensure at least {min} values are provided (got {actual}).")]
    TooFewValues { min: usize, actual: usize },

    #[error("Ensure at most {max} values are provided (got {actual}).")]
    TooManyValues { max: usize, actual: usize },

    /// One element of a multi-valued input failed its own validation
    #[error("Value #{index}: {reason}")]
    InvalidItem { index: usize, reason: Box<ValueError> },
}
