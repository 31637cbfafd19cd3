//! Validator resolution
//!
//! Picks the validator for a `(field, lookup)` pair:
//! 1. the field's natural validator
//! 2. the type override for the field kind (nearest ancestor)
//! 3. the lookup override (exact)
//!
//! Lookup overrides run last because some lookups change the shape of
//! the value whatever the field kind (`range` wants two values, `isnull`
//! wants a boolean).

use tracing::trace;

use crate::lookup::Lookup;
use crate::model::{FieldKind, ModelField};
use crate::value::{ValueValidator, DEFAULT_LIST_SEPARATOR};

use super::table::{LookupOverrides, Override, TypeOverrides};

/// Combined type and lookup override tables
#[derive(Debug, Clone)]
pub struct OverrideTable {
    types: TypeOverrides,
    lookups: LookupOverrides,
}

impl Default for OverrideTable {
    fn default() -> Self {
        Self::with_separator(DEFAULT_LIST_SEPARATOR)
    }
}

impl OverrideTable {
    /// Table with no overrides; natural validators are used as-is
    pub fn empty() -> Self {
        Self::new(TypeOverrides::new(), LookupOverrides::new())
    }

    pub fn new(types: TypeOverrides, lookups: LookupOverrides) -> Self {
        Self { types, lookups }
    }

    /// Built-in overrides, splitting multi-valued input on `separator`
    pub fn with_separator(separator: char) -> Self {
        let types = TypeOverrides::new()
            .with(FieldKind::Auto, ValueValidator::integer_between(Some(0), None))
            .with(
                FieldKind::File,
                Override::factory(|field, _| ValueValidator::Text {
                    max_length: field.max_length,
                }),
            );

        let lookups = LookupOverrides::new()
            .with(Lookup::In, multiple_values(Some(2), None, separator))
            .with(Lookup::Range, multiple_values(Some(2), Some(2), separator))
            .with(Lookup::IsNull, ValueValidator::Boolean)
            .with(Lookup::Second, ValueValidator::integer_between(Some(0), Some(59)))
            .with(Lookup::Minute, ValueValidator::integer_between(Some(0), Some(59)))
            .with(Lookup::Hour, ValueValidator::integer_between(Some(0), Some(23)))
            .with(Lookup::WeekDay, ValueValidator::integer_between(Some(1), Some(7)))
            .with(Lookup::Day, ValueValidator::integer_between(Some(1), Some(31)))
            .with(Lookup::Month, ValueValidator::integer())
            .with(Lookup::Year, ValueValidator::integer_between(Some(0), Some(9999)));

        Self::new(types, lookups)
    }

    pub fn types(&self) -> &TypeOverrides {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeOverrides {
        &mut self.types
    }

    pub fn lookups(&self) -> &LookupOverrides {
        &self.lookups
    }

    pub fn lookups_mut(&mut self) -> &mut LookupOverrides {
        &mut self.lookups
    }

    /// Resolves the validator for `field` filtered with `lookup`
    pub fn resolve(&self, field: &ModelField, lookup: Lookup) -> ValueValidator {
        let mut validator = field.natural_validator();

        if let Some(entry) = self.types.get(&field.kind) {
            validator = entry.apply(field, validator);
        }

        if let Some(entry) = self.lookups.get(lookup) {
            validator = entry.apply(field, validator);
        }

        trace!(
            field = %field.name,
            kind = field.kind.type_name(),
            lookup = %lookup,
            validator = validator.type_name(),
            "resolved value validator"
        );
        validator
    }
}

/// Factory wrapping the current validator into a list validator
pub fn multiple_values(
    min_values: Option<usize>,
    max_values: Option<usize>,
    separator: char,
) -> Override {
    Override::factory(move |_, current| ValueValidator::Multiple {
        item: Box::new(current),
        min_values,
        max_values,
        separator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_validator_without_overrides() {
        let field = ModelField::new("title", FieldKind::Char).with_max_length(8);
        assert_eq!(
            OverrideTable::empty().resolve(&field, Lookup::Exact),
            ValueValidator::text_max(8)
        );
    }

    #[test]
    fn test_auto_field_is_non_negative() {
        let field = ModelField::new("id", FieldKind::Auto);
        assert_eq!(
            OverrideTable::default().resolve(&field, Lookup::Exact),
            ValueValidator::integer_between(Some(0), None)
        );
    }

    #[test]
    fn test_file_descendant_uses_max_length() {
        let field = ModelField::new("cover", FieldKind::Image).with_max_length(100);
        assert_eq!(
            OverrideTable::default().resolve(&field, Lookup::Exact),
            ValueValidator::text_max(100)
        );
    }

    #[test]
    fn test_isnull_is_boolean_for_any_kind() {
        let table = OverrideTable::default();
        for kind in [FieldKind::Auto, FieldKind::Char, FieldKind::DateTime, FieldKind::Image] {
            let field = ModelField::new("f", kind);
            assert_eq!(table.resolve(&field, Lookup::IsNull), ValueValidator::Boolean);
        }
    }

    #[test]
    fn test_in_wraps_type_override() {
        let field = ModelField::new("id", FieldKind::Auto);
        assert_eq!(
            OverrideTable::default().resolve(&field, Lookup::In),
            ValueValidator::Multiple {
                item: Box::new(ValueValidator::integer_between(Some(0), None)),
                min_values: Some(2),
                max_values: None,
                separator: ',',
            }
        );
    }

    #[test]
    fn test_range_uses_configured_separator() {
        let field = ModelField::new("published", FieldKind::Date);
        assert_eq!(
            OverrideTable::with_separator(';').resolve(&field, Lookup::Range),
            ValueValidator::Multiple {
                item: Box::new(ValueValidator::Date),
                min_values: Some(2),
                max_values: Some(2),
                separator: ';',
            }
        );
    }

    #[test]
    fn test_component_lookups() {
        let table = OverrideTable::default();
        let field = ModelField::new("created", FieldKind::DateTime);
        assert_eq!(
            table.resolve(&field, Lookup::Hour),
            ValueValidator::integer_between(Some(0), Some(23))
        );
        assert_eq!(
            table.resolve(&field, Lookup::Year),
            ValueValidator::integer_between(Some(0), Some(9999))
        );
    }
}
