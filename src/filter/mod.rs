//! Field filters
//!
//! A field filter turns one request parameter into one predicate:
//! parse the key, pick the validator, validate the value, and place the
//! result on the include or exclude side.

mod errors;
mod field_filter;
mod predicate;

pub use errors::{FilterError, FilterResult, Severity};
pub use field_filter::{FieldFilter, FieldRef};
pub use predicate::{PredicateMap, Resolution};
