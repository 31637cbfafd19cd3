//! Value validator overrides
//!
//! The natural validator of a field is not always the right one for a
//! filter: an auto primary key should not accept negatives, a file field
//! should be filtered by name, and `in`/`range`/`isnull` change the shape
//! of the value altogether. Override tables capture those adjustments.

mod resolver;
mod table;

pub use resolver::{multiple_values, OverrideTable};
pub use table::{LookupOverrides, Override, TypeOverrides, ValidatorFactory};
