//! CLI argument definitions using clap
//!
//! Commands:
//! - conform validate --schema <file> <documents...>
//! - conform validate --schema-dir <dir> --name <name> <documents...>
//! - conform check --schema-dir <dir>
//! - conform add --schema-dir <dir> <file>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// conform - a strict, composable schema validator for JSON documents
#[derive(Parser, Debug)]
#[command(name = "conform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate documents against a schema
    Validate {
        /// Path to a schema file
        #[arg(long, value_name = "FILE", conflicts_with_all = ["schema_dir", "name"])]
        schema: Option<PathBuf>,

        /// Directory of registered schema files
        #[arg(long, value_name = "DIR", requires = "name")]
        schema_dir: Option<PathBuf>,

        /// Name of a registered schema
        #[arg(long, requires = "schema_dir")]
        name: Option<String>,

        /// Document files to validate
        #[arg(required = true, value_name = "DOCUMENT")]
        documents: Vec<PathBuf>,
    },

    /// Load every schema in a directory and report what registered
    Check {
        /// Directory of registered schema files
        #[arg(long, value_name = "DIR")]
        schema_dir: PathBuf,
    },

    /// Install a schema file into a schema directory
    Add {
        /// Directory of registered schema files
        #[arg(long, value_name = "DIR")]
        schema_dir: PathBuf,

        /// Schema file to install
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
