//! Predicate maps and resolutions

use indexmap::IndexMap;
use serde::Serialize;

use crate::collection::Collection;
use crate::value::FilterValue;

/// `"{field_path}__{lookup}" -> value`, in insertion order
pub type PredicateMap = IndexMap<String, FilterValue>;

/// Include and exclude predicates produced by resolving filters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub include: PredicateMap,
    pub exclude: PredicateMap,
}

impl Resolution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-entry resolution on the include or exclude side
    pub fn single(predicate_key: String, value: FilterValue, include: bool) -> Self {
        let mut resolution = Self::default();
        let side = if include {
            &mut resolution.include
        } else {
            &mut resolution.exclude
        };
        side.insert(predicate_key, value);
        resolution
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Total number of predicates
    pub fn len(&self) -> usize {
        self.include.len() + self.exclude.len()
    }

    /// Merges `other` into `self`; later values win on key collisions
    pub fn merge(&mut self, other: Resolution) {
        self.include.extend(other.include);
        self.exclude.extend(other.exclude);
    }

    /// Applies include then exclude predicates, skipping empty sides
    pub fn apply<C: Collection>(&self, collection: &C) -> C {
        let mut result = collection.clone();
        if !self.include.is_empty() {
            result = result.filter(&self.include);
        }
        if !self.exclude.is_empty() {
            result = result.exclude(&self.exclude);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_sides() {
        let include = Resolution::single("id__exact".into(), FilterValue::Int(1), true);
        assert_eq!(include.include.len(), 1);
        assert!(include.exclude.is_empty());

        let exclude = Resolution::single("id__exact".into(), FilterValue::Int(1), false);
        assert!(exclude.include.is_empty());
        assert_eq!(exclude.exclude.len(), 1);
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut merged = Resolution::single("id__exact".into(), FilterValue::Int(1), true);
        merged.merge(Resolution::single("name__exact".into(), FilterValue::Text("a".into()), true));
        merged.merge(Resolution::single("id__exact".into(), FilterValue::Int(2), true));

        assert_eq!(merged.include.len(), 2);
        assert_eq!(merged.include["id__exact"], FilterValue::Int(2));
        // Overwritten keys keep their first position.
        assert_eq!(merged.include.keys().next().unwrap(), "id__exact");
    }
}
