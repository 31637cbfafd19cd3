//! Model registry
//!
//! Holds the models filter definitions are built against. Models can be
//! registered in code or loaded from a directory of JSON files, one model
//! per file:
//!
//! ```json
//! {"name": "book", "fields": [{"name": "id", "type": "auto"}]}
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::errors::{ModelError, ModelResult};
use super::types::Model;

/// In-memory registry of models indexed by name
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Model>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model.
    ///
    /// # Errors
    ///
    /// - `ModelError::Malformed` if the model structure is invalid
    /// - `ModelError::DuplicateModel` if the name is taken
    pub fn register(&mut self, model: Model) -> ModelResult<()> {
        model
            .validate_structure()
            .map_err(|reason| ModelError::malformed(&model.name, reason))?;

        if self.models.contains_key(&model.name) {
            return Err(ModelError::DuplicateModel(model.name));
        }

        debug!(model = %model.name, fields = model.fields.len(), "registered model");
        self.models.insert(model.name.clone(), model);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Registered model names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Loads every `*.json` file in `dir` as a model.
    ///
    /// Files are loaded in name order so failures are reproducible.
    /// Returns the number of models loaded.
    pub fn load_dir(&mut self, dir: &Path) -> ModelResult<usize> {
        let entries = fs::read_dir(dir).map_err(|e| ModelError::io(dir.display().to_string(), e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ModelError::io(dir.display().to_string(), e))?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }

        info!(dir = %dir.display(), models = paths.len(), "loaded models");
        Ok(paths.len())
    }

    /// Loads a single model file
    pub fn load_file(&mut self, path: &Path) -> ModelResult<()> {
        let content =
            fs::read_to_string(path).map_err(|e| ModelError::io(path.display().to_string(), e))?;

        let model: Model = serde_json::from_str(&content).map_err(|e| {
            ModelError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        self.register(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldKind, ModelField};
    use tempfile::TempDir;

    fn book() -> Model {
        Model::new("book")
            .with_field(ModelField::new("id", FieldKind::Auto))
            .with_field(ModelField::new("title", FieldKind::Char))
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ModelRegistry::new();
        registry.register(book()).unwrap();

        assert!(registry.contains("book"));
        assert_eq!(registry.get("book").unwrap().fields().len(), 2);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = ModelRegistry::new();
        registry.register(book()).unwrap();
        assert_eq!(
            registry.register(book()),
            Err(ModelError::DuplicateModel("book".into()))
        );
    }

    #[test]
    fn test_load_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("book.json"),
            r#"{"name": "book", "fields": [{"name": "id", "type": "auto"}]}"#,
        )
        .unwrap();
        fs::write(
            tmp.path().join("author.json"),
            r#"{"name": "author", "fields": [{"name": "name", "type": "char", "max_length": 32}]}"#,
        )
        .unwrap();
        fs::write(tmp.path().join("README.txt"), "not a model").unwrap();

        let mut registry = ModelRegistry::new();
        assert_eq!(registry.load_dir(tmp.path()).unwrap(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["author", "book"]);
    }

    #[test]
    fn test_malformed_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.json"), "{").unwrap();

        let mut registry = ModelRegistry::new();
        assert!(matches!(
            registry.load_dir(tmp.path()),
            Err(ModelError::Malformed { .. })
        ));
    }

    #[test]
    fn test_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let mut registry = ModelRegistry::new();
        assert!(matches!(
            registry.load_dir(&tmp.path().join("nope")),
            Err(ModelError::Io { .. })
        ));
    }
}
