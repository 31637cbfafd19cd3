//! Filter set definitions

use std::sync::Arc;

use indexmap::IndexMap;

use crate::filter::FieldFilter;
use crate::model::Model;
use crate::overrides::OverrideTable;

use super::builder::FilterSetBuilder;

/// Immutable set of field filters for one resource type.
///
/// Built once by `FilterSetBuilder` and shared behind an `Arc` by every
/// request-scoped `FilterSet`.
#[derive(Debug, Clone)]
pub struct FilterSetDefinition {
    pub(super) name: String,
    pub(super) model: Option<Model>,
    pub(super) base_filters: IndexMap<String, FieldFilter>,
    pub(super) overrides: Arc<OverrideTable>,
}

impl FilterSetDefinition {
    pub fn builder(name: impl Into<String>) -> FilterSetBuilder {
        FilterSetBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Filters by query-string key, in matching order
    pub fn base_filters(&self) -> &IndexMap<String, FieldFilter> {
        &self.base_filters
    }

    pub fn filter(&self, key: &str) -> Option<&FieldFilter> {
        self.base_filters.get(key)
    }

    pub fn overrides(&self) -> &Arc<OverrideTable> {
        &self.overrides
    }

    pub fn len(&self) -> usize {
        self.base_filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base_filters.is_empty()
    }
}
