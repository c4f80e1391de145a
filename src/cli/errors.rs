//! Errors the CLI commands can fail with

use thiserror::Error;

use crate::registry::RegistryError;

#[derive(Debug, Error)]
pub enum CliError {
    /// Argument combination clap cannot express on its own
    #[error("usage error: {0}")]
    Usage(String),

    /// A document or schema file could not be read
    #[error("cannot read '{path}': {reason}")]
    ReadFailed { path: String, reason: String },

    /// A file was read but does not hold the expected JSON
    #[error("invalid JSON in '{path}': {reason}")]
    InvalidJson { path: String, reason: String },

    /// Registry failure, reported under its own code
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// One or more documents failed validation
    #[error("{failed} of {total} documents failed validation")]
    DocumentsInvalid { failed: usize, total: usize },

    /// stdout failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Response serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Returns the stable code string for the JSON line protocol.
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Usage(_) => "CLI_USAGE_ERROR",
            CliError::ReadFailed { .. } => "CLI_READ_ERROR",
            CliError::InvalidJson { .. } => "CLI_INVALID_JSON",
            CliError::Registry(e) => e.code(),
            CliError::DocumentsInvalid { .. } => "CLI_DOCUMENTS_INVALID",
            CliError::Io(_) => "CLI_IO_ERROR",
            CliError::Json(_) => "CLI_JSON_ERROR",
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
