//! Model introspection
//!
//! Describes the models filters are declared against: ordered fields with
//! a static kind, from which the natural value validator is derived.

mod errors;
mod registry;
mod types;

pub use errors::{ModelError, ModelResult};
pub use registry::ModelRegistry;
pub use types::{FieldKind, Model, ModelField};
