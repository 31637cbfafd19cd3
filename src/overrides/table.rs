//! Override tables
//!
//! Two tables adjust the natural validator of a field:
//! - `TypeOverrides`, keyed by field kind, matched against the kind and
//!   then its ancestors, nearest first
//! - `LookupOverrides`, keyed by lookup, exact match only

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::lookup::Lookup;
use crate::model::{FieldKind, ModelField};
use crate::value::ValueValidator;

/// Builds a validator from the field and the validator selected so far
pub type ValidatorFactory =
    Arc<dyn Fn(&ModelField, ValueValidator) -> ValueValidator + Send + Sync>;

/// One override entry
#[derive(Clone)]
pub enum Override {
    /// Replaces the current validator
    Validator(ValueValidator),
    /// Computes the replacement from the field and the current validator
    Factory(ValidatorFactory),
}

impl Override {
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn(&ModelField, ValueValidator) -> ValueValidator + Send + Sync + 'static,
    {
        Override::Factory(Arc::new(factory))
    }

    /// Applies the override on top of `current`
    pub fn apply(&self, field: &ModelField, current: ValueValidator) -> ValueValidator {
        match self {
            Override::Validator(validator) => validator.clone(),
            Override::Factory(factory) => factory(field, current),
        }
    }
}

impl fmt::Debug for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Override::Validator(validator) => f.debug_tuple("Validator").field(validator).finish(),
            Override::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl From<ValueValidator> for Override {
    fn from(validator: ValueValidator) -> Self {
        Override::Validator(validator)
    }
}

/// Overrides keyed by field kind.
///
/// Entries are kept in registration order. Registering a kind twice
/// replaces the earlier entry in place.
#[derive(Debug, Clone, Default)]
pub struct TypeOverrides {
    entries: Vec<(FieldKind, Override)>,
}

impl TypeOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: FieldKind, entry: impl Into<Override>) {
        let entry = entry.into();
        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some(existing) => existing.1 = entry,
            None => self.entries.push((kind, entry)),
        }
    }

    pub fn with(mut self, kind: FieldKind, entry: impl Into<Override>) -> Self {
        self.insert(kind, entry);
        self
    }

    /// Finds the override for `kind`.
    ///
    /// The exact kind wins; otherwise the nearest registered ancestor is
    /// used. Kinds have a single parent, so the nearest ancestor is unique.
    pub fn get(&self, kind: &FieldKind) -> Option<&Override> {
        kind.lineage().iter().find_map(|candidate| {
            self.entries
                .iter()
                .find(|(k, _)| k == candidate)
                .map(|(_, entry)| entry)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Overrides keyed by lookup, exact match only
#[derive(Debug, Clone, Default)]
pub struct LookupOverrides {
    entries: HashMap<Lookup, Override>,
}

impl LookupOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, lookup: Lookup, entry: impl Into<Override>) {
        self.entries.insert(lookup, entry.into());
    }

    pub fn with(mut self, lookup: Lookup, entry: impl Into<Override>) -> Self {
        self.insert(lookup, entry);
        self
    }

    pub fn get(&self, lookup: Lookup) -> Option<&Override> {
        self.entries.get(&lookup)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_kind_match() {
        let table = TypeOverrides::new().with(FieldKind::Char, ValueValidator::text_max(1));
        assert!(table.get(&FieldKind::Char).is_some());
        assert!(table.get(&FieldKind::Integer).is_none());
    }

    #[test]
    fn test_ancestor_match() {
        let table = TypeOverrides::new().with(FieldKind::File, ValueValidator::text_max(1));
        assert!(table.get(&FieldKind::Image).is_some());
        assert!(table.get(&FieldKind::custom("avatar", FieldKind::Image)).is_some());
    }

    #[test]
    fn test_reinsert_replaces() {
        let mut table = TypeOverrides::new();
        table.insert(FieldKind::Char, ValueValidator::text_max(1));
        table.insert(FieldKind::Char, ValueValidator::text_max(2));
        assert_eq!(table.len(), 1);

        let field = ModelField::new("f", FieldKind::Char);
        let resolved = table
            .get(&FieldKind::Char)
            .unwrap()
            .apply(&field, ValueValidator::text());
        assert_eq!(resolved, ValueValidator::text_max(2));
    }

    #[test]
    fn test_factory_receives_current() {
        let entry = Override::factory(|_, current| ValueValidator::multiple(current));
        let field = ModelField::new("f", FieldKind::Integer);
        assert_eq!(
            entry.apply(&field, ValueValidator::integer()),
            ValueValidator::multiple(ValueValidator::integer())
        );
    }

    #[test]
    fn test_lookup_exact_only() {
        let table = LookupOverrides::new().with(Lookup::IsNull, ValueValidator::Boolean);
        assert!(table.get(Lookup::IsNull).is_some());
        assert!(table.get(Lookup::Exact).is_none());
    }
}
