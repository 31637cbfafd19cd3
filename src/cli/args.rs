//! CLI argument definitions using clap
//!
//! Commands:
//! - urlfilter describe --config <path> [--resource <name>]
//! - urlfilter explain --config <path> --resource <name> [key=value]...
//! - urlfilter query --config <path> --resource <name> [--data <path>] [key=value]...

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// urlfilter - declarative query-string filtering
#[derive(Parser, Debug)]
#[command(name = "urlfilter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List resources and their filters
    Describe {
        /// Path to configuration file
        #[arg(long, default_value = "./urlfilter.json")]
        config: PathBuf,

        /// Only describe this resource
        #[arg(long)]
        resource: Option<String>,
    },

    /// Resolve parameters into include/exclude predicates
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./urlfilter.json")]
        config: PathBuf,

        /// Resource to filter
        #[arg(long)]
        resource: String,

        /// Filter parameters as key=value
        params: Vec<String>,
    },

    /// Filter a JSON array of documents
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./urlfilter.json")]
        config: PathBuf,

        /// Resource to filter
        #[arg(long)]
        resource: String,

        /// JSON array file; read from stdin when omitted
        #[arg(long)]
        data: Option<PathBuf>,

        /// Filter parameters as key=value
        params: Vec<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
