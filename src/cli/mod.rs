//! CLI module for urlfilter
//!
//! Provides command-line interface for:
//! - describe: List resources and their filters
//! - explain: Resolve parameters into predicates
//! - query: Filter a JSON array of documents

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{describe, explain, parse_params, query, run, run_command, LOG_ENV};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_document, write_error, write_response};
