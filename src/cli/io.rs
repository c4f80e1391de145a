//! JSON line I/O for the CLI
//!
//! Every command writes JSON lines to stdout:
//! - success: `{"status":"ok","data":...}`
//! - failure: `{"status":"error","code":...,"message":...}`
//!
//! File reading helpers live here too, so commands stay thin.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::json;

use crate::registry::NamedSchema;
use crate::value::Value;

use super::errors::{CliError, CliResult};

/// Write a success response line to stdout
pub fn write_response(data: serde_json::Value) -> CliResult<()> {
    write_json(&json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response line to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_json(&json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}

/// Write one JSON value as a line to stdout
pub fn write_json(value: &serde_json::Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Read a JSON document file into a validator value.
///
/// The extended `$date`, `$bigint` and `$undefined` forms are recognized
/// during conversion.
pub fn read_document(path: &Path) -> CliResult<Value> {
    Ok(Value::from(read_json_file(path)?))
}

/// Read a named schema file
pub fn read_named_schema(path: &Path) -> CliResult<NamedSchema> {
    let json = read_json_file(path)?;
    serde_json::from_value(json).map_err(|e| CliError::InvalidJson {
        path: path.display().to_string(),
        reason: format!("not a named schema: {}", e),
    })
}

fn read_json_file(path: &Path) -> CliResult<serde_json::Value> {
    let content = fs::read_to_string(path).map_err(|e| CliError::ReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| CliError::InvalidJson {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
