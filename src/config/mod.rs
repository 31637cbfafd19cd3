//! Filter configuration
//!
//! Declares resources and their filters in a JSON file:
//!
//! ```json
//! {
//!   "models_dir": "models",
//!   "list_separator": ",",
//!   "resources": [
//!     {"name": "books", "model": "book", "exclude": ["cover"]},
//!     {"name": "catalog", "extends": ["books"],
//!      "filters": {"q": {"field": "title", "default_lookup": "icontains"}}}
//!   ]
//! }
//! ```
//!
//! Every field except `resources` has a default. Relative `models_dir`
//! paths are resolved against the config file's directory.

mod errors;

pub use errors::{ConfigError, ConfigResult};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::filter::FieldFilter;
use crate::filterset::FilterSetDefinition;
use crate::lookup::{Lookup, LookupSet, LOOKUP_SEP};
use crate::model::ModelRegistry;
use crate::overrides::OverrideTable;
use crate::value::DEFAULT_LIST_SEPARATOR;

/// Top-level configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Directory of model JSON files (optional)
    #[serde(default)]
    pub models_dir: Option<PathBuf>,

    /// Lookup used by model-derived and declared filters when a key has
    /// none (default "exact")
    #[serde(default = "default_lookup")]
    pub default_lookup: Lookup,

    /// Separator for `in` and `range` values (default ',')
    #[serde(default = "default_list_separator")]
    pub list_separator: char,

    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

/// One filterable resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub name: String,

    /// Registered model name
    #[serde(default)]
    pub model: Option<String>,

    /// Only derive filters for these model fields
    #[serde(default)]
    pub fields: Option<Vec<String>>,

    #[serde(default)]
    pub exclude: Vec<String>,

    /// Resources to inherit filters from, declared earlier in the file
    #[serde(default)]
    pub extends: Vec<String>,

    /// Declared filters by name, in matching order
    #[serde(default)]
    pub filters: IndexMap<String, FilterDeclaration>,
}

/// One declared filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterDeclaration {
    /// Query-string key (default: the filter name)
    #[serde(default)]
    pub key: Option<String>,

    /// Model field (default: the filter name)
    #[serde(default)]
    pub field: Option<String>,

    #[serde(default)]
    pub default_lookup: Option<Lookup>,

    /// Lookup whitelist (default: every lookup)
    #[serde(default)]
    pub lookups: Option<LookupSet>,
}

fn default_lookup() -> Lookup {
    Lookup::Exact
}

fn default_list_separator() -> char {
    DEFAULT_LIST_SEPARATOR
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            models_dir: None,
            default_lookup: default_lookup(),
            list_separator: default_list_separator(),
            resources: Vec::new(),
        }
    }
}

impl FilterDeclaration {
    /// Builds the unresolved field filter for `name`
    fn to_filter(&self, name: &str, fallback_lookup: Lookup) -> FieldFilter {
        let field = self.field.as_deref().unwrap_or(name);
        let default_lookup = self.default_lookup.unwrap_or(fallback_lookup);
        let mut filter = FieldFilter::named(field).default_lookup(default_lookup);
        if let Some(key) = &self.key {
            filter = filter.key(key.clone());
        }
        if let Some(lookups) = &self.lookups {
            filter = filter.lookups(lookups.clone());
        }
        filter
    }
}

impl FilterConfig {
    /// Loads and validates a configuration file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut config: FilterConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Malformed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if let (Some(dir), Some(base)) = (&config.models_dir, path.parent()) {
            if dir.is_relative() {
                config.models_dir = Some(base.join(dir));
            }
        }

        config.validate()?;

        info!(
            path = %path.display(),
            resources = config.resources.len(),
            "loaded filter configuration"
        );
        Ok(config)
    }

    /// Validates values serde cannot check
    pub fn validate(&self) -> ConfigResult<()> {
        if self.list_separator.is_alphanumeric() || self.list_separator == '_' {
            return Err(ConfigError::Invalid(format!(
                "list_separator '{}' must not be alphanumeric or '_'",
                self.list_separator
            )));
        }

        let mut seen = HashSet::new();
        for resource in &self.resources {
            if resource.name.trim().is_empty() {
                return Err(ConfigError::Invalid("resource name must not be empty".into()));
            }
            if !seen.insert(resource.name.as_str()) {
                return Err(ConfigError::DuplicateResource(resource.name.clone()));
            }

            for (name, declaration) in &resource.filters {
                if let Some(key) = &declaration.key {
                    if key.is_empty() || key.contains(LOOKUP_SEP) {
                        return Err(ConfigError::Invalid(format!(
                            "filter '{}' of '{}': key '{}' must be non-empty and contain no '{}'",
                            name, resource.name, key, LOOKUP_SEP
                        )));
                    }
                }

                let lookup = declaration.default_lookup.unwrap_or(self.default_lookup);
                if let Some(lookups) = &declaration.lookups {
                    if !lookups.contains(lookup) {
                        return Err(ConfigError::Invalid(format!(
                            "filter '{}' of '{}': default lookup '{}' is not in its lookups",
                            name, resource.name, lookup
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Override table shared by every definition built from this config
    pub fn override_table(&self) -> OverrideTable {
        OverrideTable::with_separator(self.list_separator)
    }

    /// Loads the models directory, if one is configured
    pub fn load_models(&self) -> ConfigResult<ModelRegistry> {
        let mut registry = ModelRegistry::new();
        if let Some(dir) = &self.models_dir {
            registry.load_dir(dir)?;
        }
        Ok(registry)
    }

    /// Builds one definition per resource, in declaration order
    pub fn build_definitions(
        &self,
        registry: &ModelRegistry,
    ) -> ConfigResult<IndexMap<String, Arc<FilterSetDefinition>>> {
        self.validate()?;

        let overrides = Arc::new(self.override_table());
        let mut definitions: IndexMap<String, Arc<FilterSetDefinition>> = IndexMap::new();

        for resource in &self.resources {
            let mut builder = FilterSetDefinition::builder(&resource.name)
                .overrides(Arc::clone(&overrides))
                .default_lookup(self.default_lookup)
                .exclude(resource.exclude.iter().cloned());

            if let Some(model_name) = &resource.model {
                let model = registry.get(model_name).ok_or_else(|| ConfigError::UnknownModel {
                    resource: resource.name.clone(),
                    model: model_name.clone(),
                })?;
                builder = builder.model(model.clone());
            }

            if let Some(fields) = &resource.fields {
                builder = builder.fields(fields.iter().cloned());
            }

            for parent in &resource.extends {
                let definition = definitions.get(parent).ok_or_else(|| ConfigError::UnknownParent {
                    resource: resource.name.clone(),
                    parent: parent.clone(),
                })?;
                builder = builder.extend(Arc::clone(definition));
            }

            for (name, declaration) in &resource.filters {
                let filter = declaration.to_filter(name, self.default_lookup);
                builder = builder.filter(name.clone(), filter);
            }

            let definition = builder.build().map_err(|e| {
                warn!(resource = %resource.name, error = %e, "failed to build definition");
                e
            })?;
            definitions.insert(resource.name.clone(), Arc::new(definition));
        }

        Ok(definitions)
    }
}
