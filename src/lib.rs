//! urlfilter - declarative query-string filtering
//!
//! Translates request parameters such as `name__icontains=ann` or
//! `id__!in=1,2` into include/exclude predicate maps and applies them to a
//! collection.
//!
//! Pipeline, leaf first:
//! - `lookup`: key parsing and lookup whitelists
//! - `value`: raw value validation
//! - `overrides`: validator selection by field kind and lookup
//! - `filter`: one field filter, one parameter, one predicate
//! - `filterset`: definitions and the per-request aggregator
//!
//! Supporting modules: `model` (field introspection), `collection` (the
//! engine contract and an in-memory engine), `config` (JSON declarations)
//! and `cli`.

pub mod cli;
pub mod collection;
pub mod config;
pub mod filter;
pub mod filterset;
pub mod lookup;
pub mod model;
pub mod overrides;
pub mod value;

pub use collection::{Collection, MemoryCollection};
pub use filter::{FieldFilter, FilterError, FilterResult, PredicateMap, Resolution};
pub use filterset::{FilterSet, FilterSetBuilder, FilterSetDefinition, QueryParams};
pub use lookup::{Lookup, LookupSet};
pub use model::{FieldKind, Model, ModelField, ModelRegistry};
pub use overrides::OverrideTable;
