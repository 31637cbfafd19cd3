//! Request-scoped filter aggregation
//!
//! A `FilterSet` lives for one request. It matches every parameter to a
//! filter, merges the resulting predicates, and applies them to the base
//! collection exactly once.
//!
//! Matching rules:
//! - filters are tried in definition order; the first whose key is a
//!   prefix of the parameter key wins
//! - parameters matching no filter are skipped
//! - the matched filter parses the whole parameter key, so the predicate
//!   carries the parameter's field path
//! - any error from a matched filter fails the whole result

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::collection::Collection;
use crate::filter::{FieldFilter, FilterResult, Resolution};

use super::definition::FilterSetDefinition;
use super::params::QueryParams;

/// Per-request filter aggregator
#[derive(Debug, Clone)]
pub struct FilterSet<C: Collection> {
    definition: Arc<FilterSetDefinition>,
    filters: IndexMap<String, FieldFilter>,
    params: QueryParams,
    collection: C,
    result: Option<C>,
}

impl<C: Collection> FilterSet<C> {
    /// Creates an aggregator with a private copy of the definition's filters
    pub fn new(definition: Arc<FilterSetDefinition>, params: QueryParams, collection: C) -> Self {
        let filters = definition.base_filters().clone();
        Self {
            definition,
            filters,
            params,
            collection,
            result: None,
        }
    }

    pub fn definition(&self) -> &FilterSetDefinition {
        &self.definition
    }

    pub fn filters(&self) -> &IndexMap<String, FieldFilter> {
        &self.filters
    }

    /// Mutable access to this request's filters.
    ///
    /// Edits never reach the shared definition. A cached result is dropped.
    pub fn filters_mut(&mut self) -> &mut IndexMap<String, FieldFilter> {
        self.result = None;
        &mut self.filters
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Base collection, before any filtering
    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// First filter whose key is a prefix of `param_key`
    pub fn match_filter(&self, param_key: &str) -> Option<&FieldFilter> {
        self.filters
            .values()
            .find(|filter| param_key.starts_with(filter.display_key()))
    }

    /// Resolves every matched parameter into one merged resolution
    pub fn resolve(&self) -> FilterResult<Resolution> {
        let mut resolution = Resolution::new();

        for (key, value) in self.params.iter() {
            match self.match_filter(key) {
                Some(filter) => {
                    let fragment = filter.resolve(key, value, self.definition.overrides())?;
                    resolution.merge(fragment);
                }
                None => {
                    debug!(
                        filterset = %self.definition.name(),
                        param = key,
                        "no filter matches parameter, skipping"
                    );
                }
            }
        }

        Ok(resolution)
    }

    /// Filtered collection, computed on first call and cached
    pub fn result(&mut self) -> FilterResult<&C> {
        let result = match self.result.take() {
            Some(result) => result,
            None => self.compute()?,
        };
        Ok(self.result.insert(result))
    }

    /// Consumes the aggregator and returns the filtered collection
    pub fn into_result(mut self) -> FilterResult<C> {
        match self.result.take() {
            Some(result) => Ok(result),
            None => self.compute(),
        }
    }

    pub fn is_computed(&self) -> bool {
        self.result.is_some()
    }

    fn compute(&self) -> FilterResult<C> {
        if self.params.is_empty() {
            return Ok(self.collection.clone());
        }

        let resolution = self.resolve()?;
        debug!(
            filterset = %self.definition.name(),
            include = resolution.include.len(),
            exclude = resolution.exclude.len(),
            "applying filters"
        );
        Ok(resolution.apply(&self.collection))
    }
}
