//! CLI command implementations
//!
//! Every command loads the configuration, builds all definitions (so a
//! broken declaration fails regardless of the resource asked for) and
//! writes one JSON object to stdout.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use tracing_subscriber::EnvFilter;

use crate::collection::MemoryCollection;
use crate::config::FilterConfig;
use crate::filter::PredicateMap;
use crate::filterset::{FilterSet, FilterSetDefinition, QueryParams};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_document, write_error, write_response};

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "URLFILTER_LOG";

/// Parse arguments, run the command, and report failures as JSON
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    setup_logging(cli.verbose);

    match run_command(cli.command) {
        Ok(()) => Ok(()),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

fn setup_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Describe { config, resource } => describe(&config, resource.as_deref()),
        Command::Explain {
            config,
            resource,
            params,
        } => explain(&config, &resource, &params),
        Command::Query {
            config,
            resource,
            data,
            params,
        } => query(&config, &resource, data.as_deref(), &params),
    }
}

/// Lists resources with their filters in matching order
pub fn describe(config_path: &Path, resource: Option<&str>) -> CliResult<()> {
    let definitions = load_definitions(config_path)?;

    let selected: Vec<&Arc<FilterSetDefinition>> = match resource {
        Some(name) => vec![definitions
            .get(name)
            .ok_or_else(|| CliError::unknown_resource(name))?],
        None => definitions.values().collect(),
    };

    let resources: Vec<Value> = selected.into_iter().map(|d| describe_definition(d)).collect();
    write_response(json!({ "resources": resources }))
}

/// Resolves parameters without touching any data
pub fn explain(config_path: &Path, resource: &str, params: &[String]) -> CliResult<()> {
    let definitions = load_definitions(config_path)?;
    let definition = find_definition(&definitions, resource)?;
    let params = parse_params(params)?;

    let filterset = FilterSet::new(definition, params, MemoryCollection::new(Vec::new()));
    let resolution = filterset.resolve()?;

    let skipped: Vec<&str> = filterset
        .params()
        .iter()
        .filter(|(key, _)| filterset.match_filter(key).is_none())
        .map(|(key, _)| key)
        .collect();

    write_response(json!({
        "resource": resource,
        "include": predicates_json(&resolution.include),
        "exclude": predicates_json(&resolution.exclude),
        "skipped": skipped,
    }))
}

/// Filters a JSON array of documents and prints the matches
pub fn query(
    config_path: &Path,
    resource: &str,
    data: Option<&Path>,
    params: &[String],
) -> CliResult<()> {
    let definitions = load_definitions(config_path)?;
    let definition = find_definition(&definitions, resource)?;
    let params = parse_params(params)?;

    let documents = read_document(data)?;
    let collection = MemoryCollection::from_json(documents)
        .ok_or_else(|| CliError::invalid_argument("Data must be a JSON array of documents"))?;

    let result = FilterSet::new(definition, params, collection).into_result()?;
    let documents = result.to_json();
    let count = documents.as_array().map_or(0, Vec::len);

    write_response(json!({
        "resource": resource,
        "count": count,
        "results": documents,
    }))
}

fn load_definitions(config_path: &Path) -> CliResult<IndexMap<String, Arc<FilterSetDefinition>>> {
    let config = FilterConfig::load(config_path)?;
    let registry = config.load_models()?;
    Ok(config.build_definitions(&registry)?)
}

fn find_definition(
    definitions: &IndexMap<String, Arc<FilterSetDefinition>>,
    resource: &str,
) -> CliResult<Arc<FilterSetDefinition>> {
    definitions
        .get(resource)
        .cloned()
        .ok_or_else(|| CliError::unknown_resource(resource))
}

/// Parses `key=value` arguments; the value may be empty
pub fn parse_params(raw: &[String]) -> CliResult<QueryParams> {
    raw.iter()
        .map(|arg| {
            arg.split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| {
                    CliError::invalid_argument(format!("Expected key=value, got '{}'", arg))
                })
        })
        .collect()
}

fn predicates_json(predicates: &PredicateMap) -> Value {
    let map: Map<String, Value> = predicates
        .iter()
        .map(|(key, value)| (key.clone(), value.to_json()))
        .collect();
    Value::Object(map)
}

fn describe_definition(definition: &FilterSetDefinition) -> Value {
    let filters: Vec<Value> = definition
        .base_filters()
        .iter()
        .map(|(key, filter)| {
            json!({
                "key": key,
                "field": filter.field().name(),
                "type": filter.model_field().map(|f| f.kind.type_name().to_string()),
                "default_lookup": filter.get_default_lookup(),
                "lookups": filter.get_lookups(),
            })
        })
        .collect();

    json!({
        "name": definition.name(),
        "model": definition.model().map(|m| m.name.clone()),
        "filters": filters,
    })
}
