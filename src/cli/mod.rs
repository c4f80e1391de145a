//! Command-line surface of conform
//!
//! Three one-shot commands:
//! - validate: check documents against a schema file or a registered schema
//! - check: load a schema directory and report what registered
//! - add: install a schema file into a schema directory

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{add, check, run, run_command, validate};
pub use errors::{CliError, CliResult};
pub use io::{read_document, read_named_schema, write_error, write_json, write_response};
