//! In-memory collection engine
//!
//! A lazy collection over JSON documents. `filter` and `exclude` record a
//! step and return a new handle sharing the same documents; nothing is
//! evaluated until `evaluate` is called. The recorded steps double as a
//! query log.

use std::sync::Arc;

use serde_json::Value;

use crate::filter::PredicateMap;

use super::matcher::matches;
use super::Collection;

/// One recorded collection operation
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Filter(PredicateMap),
    Exclude(PredicateMap),
}

/// Lazily filtered list of JSON documents
#[derive(Debug, Clone)]
pub struct MemoryCollection {
    documents: Arc<Vec<Value>>,
    steps: Vec<Step>,
}

impl MemoryCollection {
    pub fn new(documents: Vec<Value>) -> Self {
        Self {
            documents: Arc::new(documents),
            steps: Vec::new(),
        }
    }

    /// Builds a collection from a JSON array
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Array(documents) => Some(Self::new(documents)),
            _ => None,
        }
    }

    /// Operations applied so far, in order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_unfiltered(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns true if both handles view the same underlying documents
    pub fn shares_documents(&self, other: &MemoryCollection) -> bool {
        Arc::ptr_eq(&self.documents, &other.documents)
    }

    /// Runs the recorded steps and returns the matching documents
    pub fn evaluate(&self) -> Vec<&Value> {
        self.documents
            .iter()
            .filter(|doc| {
                self.steps.iter().all(|step| match step {
                    Step::Filter(predicates) => matches(doc, predicates),
                    Step::Exclude(predicates) => !matches(doc, predicates),
                })
            })
            .collect()
    }

    pub fn count(&self) -> usize {
        self.evaluate().len()
    }

    /// Matching documents as a JSON array
    pub fn to_json(&self) -> Value {
        Value::Array(self.evaluate().into_iter().cloned().collect())
    }
}

impl From<Vec<Value>> for MemoryCollection {
    fn from(documents: Vec<Value>) -> Self {
        Self::new(documents)
    }
}

impl Collection for MemoryCollection {
    fn filter(&self, predicates: &PredicateMap) -> Self {
        let mut next = self.clone();
        next.steps.push(Step::Filter(predicates.clone()));
        next
    }

    fn exclude(&self, predicates: &PredicateMap) -> Self {
        let mut next = self.clone();
        next.steps.push(Step::Exclude(predicates.clone()));
        next
    }
}
