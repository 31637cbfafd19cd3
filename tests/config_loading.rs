//! Configuration Loading Tests
//!
//! Loads models and resource declarations from disk, builds definitions
//! and runs requests against them.

use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use urlfilter::collection::MemoryCollection;
use urlfilter::config::{ConfigError, FilterConfig};
use urlfilter::filter::FilterError;
use urlfilter::filterset::{FilterSet, QueryParams};
use urlfilter::lookup::Lookup;
use urlfilter::model::ModelError;
use urlfilter::value::FilterValue;

fn write_json(path: &Path, value: serde_json::Value) {
    fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

/// Creates `<tmp>/models/book.json` and `<tmp>/urlfilter.json`
fn setup(config: serde_json::Value) -> TempDir {
    let dir = TempDir::new().unwrap();
    let models = dir.path().join("models");
    fs::create_dir(&models).unwrap();

    write_json(
        &models.join("book.json"),
        json!({
            "name": "book",
            "fields": [
                {"name": "id", "type": "auto"},
                {"name": "title", "type": "char", "max_length": 100},
                {"name": "published", "type": "date", "null": true},
                {"name": "price", "type": "decimal"},
                {"name": "cover", "type": "image", "max_length": 50}
            ]
        }),
    );
    write_json(&dir.path().join("urlfilter.json"), config);
    dir
}

fn books() -> MemoryCollection {
    MemoryCollection::new(vec![
        json!({"id": 1, "title": "Dune", "published": "1965-08-01", "price": "9.99"}),
        json!({"id": 2, "title": "Dune Messiah", "published": "1969-10-15", "price": "12.50"}),
        json!({"id": 3, "title": "Neuromancer", "published": null, "price": "8.00"}),
    ])
}

// =============================================================================
// LOADING
// =============================================================================

#[test]
fn test_load_resolves_relative_models_dir() {
    let dir = setup(json!({"models_dir": "models", "resources": []}));
    let config = FilterConfig::load(&dir.path().join("urlfilter.json")).unwrap();

    assert_eq!(config.models_dir.as_deref(), Some(dir.path().join("models").as_path()));
    let registry = config.load_models().unwrap();
    assert!(registry.contains("book"));
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let err = FilterConfig::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_malformed_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("urlfilter.json");
    fs::write(&path, "{ not json").unwrap();

    let err = FilterConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Malformed { .. }));
    assert_eq!(err.code(), "URLFILTER_CONFIG_MALFORMED");
}

#[test]
fn test_unknown_lookup_in_config_is_malformed() {
    let dir = setup(json!({"default_lookup": "like"}));
    let err = FilterConfig::load(&dir.path().join("urlfilter.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Malformed { .. }));
}

#[test]
fn test_malformed_model_file() {
    let dir = setup(json!({"models_dir": "models"}));
    fs::write(dir.path().join("models").join("broken.json"), "[]").unwrap();

    let config = FilterConfig::load(&dir.path().join("urlfilter.json")).unwrap();
    let err = config.load_models().unwrap_err();
    assert!(matches!(err, ConfigError::Model(ModelError::Malformed { .. })));
}

// =============================================================================
// DEFINITIONS
// =============================================================================

#[test]
fn test_definitions_from_config() {
    let dir = setup(json!({
        "models_dir": "models",
        "resources": [
            {"name": "books", "model": "book", "exclude": ["cover"]},
            {
                "name": "catalog",
                "model": "book",
                "extends": ["books"],
                "filters": {
                    "title": {"default_lookup": "icontains", "lookups": ["icontains", "exact"]},
                    "q": {"field": "title", "default_lookup": "istartswith"}
                }
            }
        ]
    }));

    let config = FilterConfig::load(&dir.path().join("urlfilter.json")).unwrap();
    let registry = config.load_models().unwrap();
    let definitions = config.build_definitions(&registry).unwrap();

    let books = &definitions["books"];
    let keys: Vec<_> = books.base_filters().keys().cloned().collect();
    assert_eq!(keys, vec!["id", "title", "published", "price"]);

    let catalog = &definitions["catalog"];
    let keys: Vec<_> = catalog.base_filters().keys().cloned().collect();
    // `catalog` derives every field (no exclude of its own), then overlays.
    assert_eq!(keys, vec!["id", "title", "published", "price", "cover", "q"]);
    assert_eq!(catalog.filter("title").unwrap().get_default_lookup(), Lookup::IContains);
    assert!(!catalog.filter("title").unwrap().get_lookups().contains(Lookup::Gt));
}

#[test]
fn test_declared_field_missing_from_model() {
    let dir = setup(json!({
        "models_dir": "models",
        "resources": [
            {"name": "books", "model": "book", "filters": {"author": {}}}
        ]
    }));

    let config = FilterConfig::load(&dir.path().join("urlfilter.json")).unwrap();
    let registry = config.load_models().unwrap();
    assert_eq!(
        config.build_definitions(&registry).unwrap_err(),
        ConfigError::UnknownField {
            model: "book".into(),
            field: "author".into(),
        }
    );
}

#[test]
fn test_declared_filter_without_model() {
    let config: FilterConfig = serde_json::from_value(json!({
        "resources": [{"name": "loose", "filters": {"title": {}}}]
    }))
    .unwrap();

    let err = config.build_definitions(&Default::default()).unwrap_err();
    assert!(matches!(err, ConfigError::NoModel { .. }));
}

// =============================================================================
// REQUESTS AGAINST CONFIGURED DEFINITIONS
// =============================================================================

#[test]
fn test_request_through_configured_definition() {
    let dir = setup(json!({
        "models_dir": "models",
        "list_separator": ";",
        "resources": [
            {"name": "books", "model": "book",
             "filters": {"title": {"default_lookup": "icontains"}}}
        ]
    }));

    let config = FilterConfig::load(&dir.path().join("urlfilter.json")).unwrap();
    let registry = config.load_models().unwrap();
    let definitions = config.build_definitions(&registry).unwrap();
    let books_def = definitions["books"].clone();

    let params = QueryParams::from_pairs([("title", "dune"), ("id__!in", "2;3")]);
    let result = FilterSet::new(books_def.clone(), params, books()).into_result().unwrap();
    assert_eq!(result.count(), 1);
    assert_eq!(result.evaluate()[0]["id"], json!(1));

    // Separator from config: commas are no longer list separators.
    let params = QueryParams::from_pairs([("id__in", "1,2")]);
    let err = FilterSet::new(books_def.clone(), params, books()).into_result().unwrap_err();
    assert!(matches!(err, FilterError::InvalidValue { .. }));

    let params = QueryParams::from_pairs([("published__isnull", "true")]);
    let result = FilterSet::new(books_def.clone(), params, books()).into_result().unwrap();
    assert_eq!(result.to_json()[0]["title"], json!("Neuromancer"));

    let params = QueryParams::from_pairs([("published__year", "1969")]);
    let result = FilterSet::new(books_def.clone(), params, books()).into_result().unwrap();
    assert_eq!(result.count(), 1);

    let params = QueryParams::from_pairs([("price__lt", "10")]);
    let resolution = FilterSet::new(books_def, params, books()).resolve().unwrap();
    assert_eq!(resolution.include["price__lt"], FilterValue::Decimal("10".into()));
}
