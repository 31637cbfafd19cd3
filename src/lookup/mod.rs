//! Filter key parsing
//!
//! Turns a raw query-string key such as `name__!icontains` into the field
//! path, lookup and include/exclude flag it encodes.

mod errors;
mod parser;
mod types;

pub use errors::{KeyError, KeyResult};
pub use parser::{KeyParser, ParsedKey};
pub use types::{Lookup, LookupSet, LOOKUP_SEP};
