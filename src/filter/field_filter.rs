//! Field filter
//!
//! Binds one model field to the lookups it accepts, its default lookup and
//! its value validation, and resolves `(key, value)` pairs against it.
//!
//! Field filters are immutable once a definition is built. Resolution
//! computes validators on the fly and never stores them on the filter.

use tracing::trace;

use crate::collection::Collection;
use crate::lookup::{KeyError, KeyParser, Lookup, LookupSet, ParsedKey};
use crate::model::{Model, ModelField};
use crate::overrides::OverrideTable;
use crate::value::ValueValidator;

use super::errors::{FilterError, FilterResult};
use super::predicate::Resolution;

/// The field a filter applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRef {
    /// Field name, resolved against the definition's model at build time
    Named(String),
    /// Field descriptor
    Resolved(ModelField),
}

impl FieldRef {
    /// Name of the referenced field
    pub fn name(&self) -> &str {
        match self {
            FieldRef::Named(name) => name,
            FieldRef::Resolved(field) => &field.name,
        }
    }

    pub fn as_field(&self) -> Option<&ModelField> {
        match self {
            FieldRef::Named(_) => None,
            FieldRef::Resolved(field) => Some(field),
        }
    }
}

/// Filter for a single model field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    field: FieldRef,
    key: Option<String>,
    parser: KeyParser,
}

impl FieldFilter {
    /// Filter for a resolved field descriptor
    pub fn new(field: ModelField) -> Self {
        Self {
            field: FieldRef::Resolved(field),
            key: None,
            parser: KeyParser::default(),
        }
    }

    /// Filter for a field referenced by name
    pub fn named(field: impl Into<String>) -> Self {
        Self {
            field: FieldRef::Named(field.into()),
            key: None,
            parser: KeyParser::default(),
        }
    }

    /// Sets the query-string key (without lookup)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the lookup used when the key has none
    pub fn default_lookup(mut self, lookup: Lookup) -> Self {
        self.parser.set_default_lookup(lookup);
        self
    }

    /// Restricts the accepted lookups
    pub fn lookups(mut self, lookups: impl Into<LookupSet>) -> Self {
        self.parser.set_lookups(lookups.into());
        self
    }

    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    pub fn model_field(&self) -> Option<&ModelField> {
        self.field.as_field()
    }

    pub fn get_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Key used in diagnostics: the configured key, else the field name
    pub fn display_key(&self) -> &str {
        self.key.as_deref().unwrap_or_else(|| self.field.name())
    }

    pub fn get_default_lookup(&self) -> Lookup {
        self.parser.default_lookup()
    }

    pub fn get_lookups(&self) -> &LookupSet {
        self.parser.lookups()
    }

    /// Assigns `key` if none was configured. Returns the effective key.
    pub(crate) fn backfill_key(&mut self, key: &str) -> &str {
        self.key.get_or_insert_with(|| key.to_string())
    }

    /// Resolves a `FieldRef::Named` against `model`.
    ///
    /// Returns the missing field name on failure.
    pub(crate) fn resolve_field(&mut self, model: &Model) -> Result<(), String> {
        let resolved = match &self.field {
            FieldRef::Resolved(_) => return Ok(()),
            FieldRef::Named(name) => model.field(name).cloned().ok_or_else(|| name.clone())?,
        };
        self.field = FieldRef::Resolved(resolved);
        Ok(())
    }

    /// Parses `raw_key` against this filter's lookup configuration
    pub fn parse_key(&self, raw_key: &str) -> FilterResult<ParsedKey> {
        self.parser.parse(raw_key).map_err(|e| match e {
            KeyError::InvalidFormat(raw) => FilterError::KeyFormat {
                key: self.display_key().to_string(),
                raw,
            },
            KeyError::UnsupportedLookup(lookup) => FilterError::UnsupportedLookup {
                key: self.display_key().to_string(),
                lookup,
            },
        })
    }

    /// Resolves the value validator for `lookup`.
    ///
    /// # Errors
    ///
    /// `FilterError::UnresolvedField` if the filter does not hold a field
    /// descriptor.
    pub fn value_validator(
        &self,
        lookup: Lookup,
        overrides: &OverrideTable,
    ) -> FilterResult<ValueValidator> {
        let field = self.field.as_field().ok_or_else(|| FilterError::UnresolvedField {
            key: self.display_key().to_string(),
            field: self.field.name().to_string(),
        })?;
        Ok(overrides.resolve(field, lookup))
    }

    /// Resolves one request parameter into a single predicate.
    ///
    /// The predicate lands in `include`, or in `exclude` when the key is
    /// negated.
    pub fn resolve(
        &self,
        raw_key: &str,
        raw_value: &str,
        overrides: &OverrideTable,
    ) -> FilterResult<Resolution> {
        let parsed = self.parse_key(raw_key)?;
        let validator = self.value_validator(parsed.lookup, overrides)?;

        let value = validator
            .validate(raw_value)
            .map_err(|e| FilterError::InvalidValue {
                key: self.display_key().to_string(),
                message: e.to_string(),
            })?;

        trace!(key = raw_key, predicate = %parsed, value = %value, "resolved filter parameter");
        Ok(Resolution::single(parsed.predicate_key(), value, parsed.include))
    }

    /// Resolves one parameter and applies it to `collection`
    pub fn filter<C: Collection>(
        &self,
        collection: &C,
        raw_key: &str,
        raw_value: &str,
        overrides: &OverrideTable,
    ) -> FilterResult<C> {
        let resolution = self.resolve(raw_key, raw_value, overrides)?;
        Ok(resolution.apply(collection))
    }
}
