//! Collection engine contract
//!
//! Filters do not execute queries; they hand predicate maps to a
//! collection engine. The engine must be referentially transparent:
//! `filter` and `exclude` return a new handle and leave `self` untouched.

mod matcher;
mod memory;

pub use matcher::{matches, matches_predicate};
pub use memory::{MemoryCollection, Step};

use crate::filter::PredicateMap;

/// A queryable collection handle.
///
/// Predicate keys have the form `{field_path}__{lookup}`. Both operations
/// AND their predicates together; `exclude` drops every item matching all
/// of its predicates.
pub trait Collection: Clone {
    /// Keeps items matching every predicate
    fn filter(&self, predicates: &PredicateMap) -> Self;

    /// Drops items matching every predicate
    fn exclude(&self, predicates: &PredicateMap) -> Self;
}
