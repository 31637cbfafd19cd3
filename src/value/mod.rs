//! Value validation
//!
//! Raw query-string values are strings; predicates need typed values.
//! This module holds the validators that bridge the two.

mod errors;
mod types;
mod validator;

pub use errors::{ValueError, ValueResult};
pub use types::FilterValue;
pub use validator::{ValueValidator, DEFAULT_LIST_SEPARATOR};
