//! Filter sets
//!
//! `FilterSetDefinition` is the immutable, shared declaration of a
//! resource's filters, produced by `FilterSetBuilder`. `FilterSet` is the
//! per-request aggregator that applies a definition to a collection.

mod aggregator;
mod builder;
mod definition;
mod params;

pub use aggregator::FilterSet;
pub use builder::FilterSetBuilder;
pub use definition::FilterSetDefinition;
pub use params::QueryParams;
