//! Filter set builder
//!
//! Gathers field filters for one resource type, in this order:
//! 1. one filter per model field, narrowed by `fields` / `exclude`
//! 2. parent definitions, in the order they were added
//! 3. filters declared on this builder
//!
//! Filters are keyed by their query-string key. A later entry with the
//! same key replaces the earlier one in place; new keys are appended. The
//! map order is the prefix-matching order used at request time.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::info;

use crate::config::{ConfigError, ConfigResult};
use crate::filter::FieldFilter;
use crate::lookup::{Lookup, LookupSet};
use crate::model::Model;
use crate::overrides::OverrideTable;

use super::definition::FilterSetDefinition;

/// Builder for `FilterSetDefinition`
#[derive(Debug, Clone)]
pub struct FilterSetBuilder {
    name: String,
    model: Option<Model>,
    fields: Option<Vec<String>>,
    exclude: Vec<String>,
    parents: Vec<Arc<FilterSetDefinition>>,
    declared: Vec<(String, FieldFilter)>,
    overrides: Option<Arc<OverrideTable>>,
    default_lookup: Option<Lookup>,
    lookups: Option<LookupSet>,
}

impl FilterSetBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: None,
            fields: None,
            exclude: Vec::new(),
            parents: Vec::new(),
            declared: Vec::new(),
            overrides: None,
            default_lookup: None,
            lookups: None,
        }
    }

    /// Model to derive filters from and to resolve named fields against
    pub fn model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    /// Only derive filters for these model fields
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Skip these model fields when deriving filters
    pub fn exclude<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Inherits every filter of `parent`
    pub fn extend(mut self, parent: Arc<FilterSetDefinition>) -> Self {
        self.parents.push(parent);
        self
    }

    /// Declares a filter under `name`; `name` is its key unless one is set
    pub fn filter(mut self, name: impl Into<String>, filter: FieldFilter) -> Self {
        self.declared.push((name.into(), filter));
        self
    }

    /// Override table shared by every request; defaults to the built-in table
    pub fn overrides(mut self, overrides: Arc<OverrideTable>) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Default lookup for model-derived filters
    pub fn default_lookup(mut self, lookup: Lookup) -> Self {
        self.default_lookup = Some(lookup);
        self
    }

    /// Lookup whitelist for model-derived filters
    pub fn lookups(mut self, lookups: impl Into<LookupSet>) -> Self {
        self.lookups = Some(lookups.into());
        self
    }

    /// Builds the definition.
    ///
    /// # Errors
    ///
    /// - `ConfigError::UnknownField` if `fields` or a declared filter names a
    ///   field the model does not have
    /// - `ConfigError::NoModel` if a field must be resolved but no model is
    ///   configured
    pub fn build(self) -> ConfigResult<FilterSetDefinition> {
        let mut filters: IndexMap<String, FieldFilter> = IndexMap::new();

        self.derive_model_filters(&mut filters)?;

        for parent in &self.parents {
            for filter in parent.base_filters().values() {
                filters.insert(filter.display_key().to_string(), filter.clone());
            }
        }

        for (name, mut filter) in self.declared {
            if filter.model_field().is_none() {
                let model = self.model.as_ref().ok_or_else(|| ConfigError::NoModel {
                    filter: name.clone(),
                    field: filter.field().name().to_string(),
                })?;
                filter
                    .resolve_field(model)
                    .map_err(|field| ConfigError::UnknownField {
                        model: model.name.clone(),
                        field,
                    })?;
            }
            let key = filter.backfill_key(&name).to_string();
            filters.insert(key, filter);
        }

        info!(
            filterset = %self.name,
            filters = filters.len(),
            parents = self.parents.len(),
            "built filter set definition"
        );

        Ok(FilterSetDefinition {
            name: self.name,
            model: self.model,
            base_filters: filters,
            overrides: self.overrides.unwrap_or_default(),
        })
    }

    fn derive_model_filters(
        &self,
        filters: &mut IndexMap<String, FieldFilter>,
    ) -> ConfigResult<()> {
        let Some(model) = &self.model else {
            if let Some(field) = self.fields.iter().flatten().next() {
                return Err(ConfigError::NoModel {
                    filter: self.name.clone(),
                    field: field.clone(),
                });
            }
            return Ok(());
        };

        if let Some(fields) = &self.fields {
            if let Some(unknown) = fields.iter().find(|name| model.field(name).is_none()) {
                return Err(ConfigError::UnknownField {
                    model: model.name.clone(),
                    field: unknown.clone(),
                });
            }
        }

        for field in model.fields() {
            let selected = self
                .fields
                .as_ref()
                .map_or(true, |names| names.contains(&field.name));
            if !selected || self.exclude.contains(&field.name) {
                continue;
            }

            let mut filter = FieldFilter::new(field.clone()).key(field.name.clone());
            if let Some(lookup) = self.default_lookup {
                filter = filter.default_lookup(lookup);
            }
            if let Some(lookups) = &self.lookups {
                filter = filter.lookups(lookups.clone());
            }
            filters.insert(field.name.clone(), filter);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldKind, ModelField};

    fn book() -> Model {
        Model::new("book")
            .with_field(ModelField::new("id", FieldKind::Auto))
            .with_field(ModelField::new("title", FieldKind::Char).with_max_length(100))
            .with_field(ModelField::new("published", FieldKind::Date))
    }

    fn keys(definition: &FilterSetDefinition) -> Vec<&str> {
        definition.base_filters().keys().map(String::as_str).collect()
    }

    #[test]
    fn test_derives_filter_per_model_field() {
        let definition = FilterSetBuilder::new("books").model(book()).build().unwrap();
        assert_eq!(keys(&definition), vec!["id", "title", "published"]);
        assert_eq!(definition.filter("title").unwrap().get_key(), Some("title"));
    }

    #[test]
    fn test_fields_and_exclude_narrow_derivation() {
        let definition = FilterSetBuilder::new("books")
            .model(book())
            .fields(["id", "title"])
            .exclude(["title"])
            .build()
            .unwrap();
        assert_eq!(keys(&definition), vec!["id"]);
    }

    #[test]
    fn test_unknown_field_in_fields() {
        let err = FilterSetBuilder::new("books")
            .model(book())
            .fields(["isbn"])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownField {
                model: "book".into(),
                field: "isbn".into(),
            }
        );
    }

    #[test]
    fn test_declared_filter_replaces_in_place_and_backfills_key() {
        let definition = FilterSetBuilder::new("books")
            .model(book())
            .filter("title", FieldFilter::named("title").default_lookup(Lookup::IContains))
            .filter("name", FieldFilter::named("title"))
            .build()
            .unwrap();

        assert_eq!(keys(&definition), vec!["id", "title", "published", "name"]);
        assert_eq!(
            definition.filter("title").unwrap().get_default_lookup(),
            Lookup::IContains
        );
        assert_eq!(definition.filter("name").unwrap().get_key(), Some("name"));
        assert!(definition.filter("name").unwrap().model_field().is_some());
    }

    #[test]
    fn test_explicit_key_is_kept() {
        let definition = FilterSetBuilder::new("books")
            .model(book())
            .filter("name", FieldFilter::named("title").key("q"))
            .build()
            .unwrap();
        assert_eq!(keys(&definition), vec!["id", "title", "published", "q"]);
        assert_eq!(definition.filter("q").unwrap().get_key(), Some("q"));
        assert!(definition.filter("name").is_none());
    }

    #[test]
    fn test_declared_key_replaces_derived_filter() {
        let definition = FilterSetBuilder::new("books")
            .model(book())
            .filter(
                "by_title",
                FieldFilter::named("title")
                    .key("title")
                    .lookups(LookupSet::only([Lookup::Exact])),
            )
            .build()
            .unwrap();

        assert_eq!(keys(&definition), vec!["id", "title", "published"]);
        let title = definition.filter("title").unwrap();
        assert!(!title.get_lookups().contains(Lookup::Contains));

        let err = title
            .resolve("title__contains", "x", definition.overrides())
            .unwrap_err();
        assert!(matches!(
            err,
            crate::filter::FilterError::UnsupportedLookup { ref lookup, .. } if lookup == "contains"
        ));
    }

    #[test]
    fn test_parent_filter_keyed_by_its_key() {
        let parent = Arc::new(
            FilterSetBuilder::new("base")
                .model(book())
                .fields(["id"])
                .filter(
                    "search",
                    FieldFilter::named("title")
                        .key("title")
                        .default_lookup(Lookup::IContains),
                )
                .build()
                .unwrap(),
        );

        let child = FilterSetBuilder::new("child")
            .model(book())
            .extend(parent)
            .build()
            .unwrap();

        assert_eq!(keys(&child), vec!["id", "title", "published"]);
        assert_eq!(
            child.filter("title").unwrap().get_default_lookup(),
            Lookup::IContains
        );
    }

    #[test]
    fn test_parent_filters_overlay_then_own() {
        let parent = Arc::new(
            FilterSetBuilder::new("base")
                .model(book())
                .fields(["id"])
                .filter("extra", FieldFilter::named("title"))
                .build()
                .unwrap(),
        );

        let child = FilterSetBuilder::new("child")
            .extend(Arc::clone(&parent))
            .filter("id", FieldFilter::new(ModelField::new("id", FieldKind::Integer)))
            .build()
            .unwrap();

        assert_eq!(keys(&child), vec!["id", "extra"]);
        assert_eq!(
            child.filter("id").unwrap().model_field().unwrap().kind,
            FieldKind::Integer
        );
        // Parent is untouched.
        assert_eq!(
            parent.filter("id").unwrap().model_field().unwrap().kind,
            FieldKind::Auto
        );
    }

    #[test]
    fn test_named_field_without_model() {
        let err = FilterSetBuilder::new("books")
            .filter("title", FieldFilter::named("title"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::NoModel {
                filter: "title".into(),
                field: "title".into(),
            }
        );
    }

    #[test]
    fn test_named_field_missing_from_model() {
        let err = FilterSetBuilder::new("books")
            .model(book())
            .filter("author", FieldFilter::named("author"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownField { ref field, .. } if field == "author"));
    }

    #[test]
    fn test_default_lookup_for_derived_filters() {
        let definition = FilterSetBuilder::new("books")
            .model(book())
            .default_lookup(Lookup::IExact)
            .lookups(LookupSet::only([Lookup::Exact, Lookup::IExact]))
            .build()
            .unwrap();
        let title = definition.filter("title").unwrap();
        assert_eq!(title.get_default_lookup(), Lookup::IExact);
        assert!(!title.get_lookups().contains(Lookup::Gt));
    }
}
