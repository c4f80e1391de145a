//! CLI command implementations
//!
//! Commands are thin: they load schemas and documents, call `parse`, and
//! report one JSON line per result. All validation policy lives in the
//! schema subsystem.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::registry::{RegistryError, SchemaRegistry};
use crate::schema::{Schema, ValidationError};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_document, read_named_schema, write_error, write_json, write_response};

/// Entry point used by main.rs: parse the command line, then dispatch.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Dispatches one already-parsed command.
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Validate {
            schema,
            schema_dir,
            name,
            documents,
        } => validate(
            schema.as_deref(),
            schema_dir.as_deref(),
            name.as_deref(),
            &documents,
        ),
        Command::Check { schema_dir } => check(&schema_dir),
        Command::Add { schema_dir, file } => add(&schema_dir, &file),
    }
}

/// Validate documents against a schema from a file or a registry.
///
/// Writes one JSON line per document and keeps going past failures, so a
/// bad document never hides the results of the others. Fails with
/// `CLI_DOCUMENTS_INVALID` after the run when any document was invalid
/// or unreadable.
pub fn validate(
    schema_file: Option<&Path>,
    schema_dir: Option<&Path>,
    name: Option<&str>,
    documents: &[PathBuf],
) -> CliResult<()> {
    let (schema_name, schema) = resolve_schema(schema_file, schema_dir, name)?;

    let mut failed = 0;
    for document in documents {
        let value = match read_document(document) {
            Ok(value) => value,
            Err(e) => {
                failed += 1;
                write_error(e.code(), &e.to_string())?;
                continue;
            }
        };

        match schema.parse(&value) {
            Ok(output) => {
                write_response(json!({
                    "document": document.display().to_string(),
                    "schema": schema_name,
                    "valid": true,
                    "data": output.to_json(),
                }))?;
            }
            Err(error) => {
                failed += 1;
                write_json(&validation_report(document, &schema_name, &error))?;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::DocumentsInvalid {
            failed,
            total: documents.len(),
        });
    }
    Ok(())
}

/// Load every schema in a directory and report what registered.
pub fn check(schema_dir: &Path) -> CliResult<()> {
    let mut registry = SchemaRegistry::new(schema_dir);
    let loaded = registry.load_all()?;

    write_response(json!({
        "schema_dir": schema_dir.display().to_string(),
        "schemas": registry.names(),
        "count": loaded,
    }))?;

    Ok(())
}

/// Install a schema file into a schema directory.
///
/// The file must hold a named schema whose name is not registered yet. The
/// installed copy is written as `schema_<name>.json`.
pub fn add(schema_dir: &Path, file: &Path) -> CliResult<()> {
    let named = read_named_schema(file)?;

    let mut registry = SchemaRegistry::new(schema_dir);
    registry.load_all()?;
    registry.register(named.clone())?;
    let path = registry.save(&named)?;

    write_response(json!({
        "added": named.name,
        "path": path.display().to_string(),
    }))?;

    Ok(())
}

/// Resolve the schema to validate against.
fn resolve_schema(
    schema_file: Option<&Path>,
    schema_dir: Option<&Path>,
    name: Option<&str>,
) -> CliResult<(String, Schema)> {
    match (schema_file, schema_dir, name) {
        (Some(path), None, None) => {
            let named = read_named_schema(path)?;
            named.schema.validate_structure().map_err(|reason| {
                CliError::from(RegistryError::Malformed {
                    path: path.display().to_string(),
                    reason,
                })
            })?;
            Ok((named.name, named.schema))
        }
        (None, Some(dir), Some(name)) => {
            let mut registry = SchemaRegistry::new(dir);
            registry.load_all()?;
            let named = registry.require(name)?;
            Ok((named.name.clone(), named.schema.clone()))
        }
        _ => Err(CliError::Usage(
            "pass either --schema <file> or --schema-dir <dir> with --name <name>".into(),
        )),
    }
}

/// One JSON line for an invalid document, listing every issue.
fn validation_report(
    document: &Path,
    schema_name: &str,
    error: &ValidationError,
) -> serde_json::Value {
    let issues: Vec<serde_json::Value> = error
        .issues()
        .iter()
        .map(|issue| {
            json!({
                "path": issue.path.to_string(),
                "code": issue.code.code(),
                "message": issue.message,
            })
        })
        .collect();

    json!({
        "status": "error",
        "code": "VALIDATION_FAILED",
        "document": document.display().to_string(),
        "schema": schema_name,
        "issues": issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NamedSchema;
    use std::fs;
    use tempfile::TempDir;

    fn user_schema() -> NamedSchema {
        NamedSchema::new(
            "users",
            Schema::object()
                .field("name", Schema::string().min(1))
                .field("age", Schema::number().optional()),
        )
    }

    fn write_schema_file(dir: &Path) -> PathBuf {
        let path = dir.join("users.json");
        fs::write(&path, serde_json::to_string(&user_schema()).unwrap()).unwrap();
        path
    }

    fn write_document(dir: &Path, name: &str, content: serde_json::Value) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content.to_string()).unwrap();
        path
    }

    #[test]
    fn test_validate_against_schema_file() {
        let temp_dir = TempDir::new().unwrap();
        let schema_path = write_schema_file(temp_dir.path());
        let doc = write_document(temp_dir.path(), "ok.json", json!({ "name": "Alice" }));

        let result = validate(Some(&schema_path), None, None, &[doc]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_reports_invalid_documents() {
        let temp_dir = TempDir::new().unwrap();
        let schema_path = write_schema_file(temp_dir.path());
        let good = write_document(temp_dir.path(), "good.json", json!({ "name": "Alice" }));
        let bad = write_document(temp_dir.path(), "bad.json", json!({ "name": 7 }));

        let result = validate(Some(&schema_path), None, None, &[good, bad]);
        assert!(result.is_err());
        match result.unwrap_err() {
            CliError::DocumentsInvalid { failed, total } => {
                assert_eq!(failed, 1);
                assert_eq!(total, 2);
            }
            other => panic!("expected DocumentsInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_counts_unreadable_documents_as_failed() {
        let temp_dir = TempDir::new().unwrap();
        let schema_path = write_schema_file(temp_dir.path());
        let missing = temp_dir.path().join("absent.json");

        let result = validate(Some(&schema_path), None, None, &[missing]);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), "CLI_DOCUMENTS_INVALID");
    }

    #[test]
    fn test_validate_from_registry() {
        let temp_dir = TempDir::new().unwrap();
        let schema_dir = temp_dir.path().join("schemas");
        SchemaRegistry::new(&schema_dir).save(&user_schema()).unwrap();
        let doc = write_document(temp_dir.path(), "ok.json", json!({ "name": "Alice" }));

        let result = validate(None, Some(&schema_dir), Some("users"), &[doc]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_unknown_registry_name() {
        let temp_dir = TempDir::new().unwrap();
        let doc = write_document(temp_dir.path(), "ok.json", json!({}));

        let result = validate(None, Some(temp_dir.path()), Some("nonexistent"), &[doc]);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), "SCHEMA_NOT_FOUND");
    }

    #[test]
    fn test_validate_requires_a_schema_source() {
        let temp_dir = TempDir::new().unwrap();
        let doc = write_document(temp_dir.path(), "ok.json", json!({}));

        let result = validate(None, None, None, &[doc]);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), "CLI_USAGE_ERROR");
    }

    #[test]
    fn test_check_reports_loaded_schemas() {
        let temp_dir = TempDir::new().unwrap();
        let registry = SchemaRegistry::new(temp_dir.path());
        registry.save(&user_schema()).unwrap();
        registry
            .save(&NamedSchema::new("roles", Schema::enumeration(["admin", "user"])))
            .unwrap();

        assert!(check(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_check_fails_on_malformed_schema() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("schema_bad.json"), "{ not json").unwrap();

        let result = check(temp_dir.path());
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), "SCHEMA_MALFORMED");
    }

    #[test]
    fn test_add_installs_schema() {
        let temp_dir = TempDir::new().unwrap();
        let schema_dir = temp_dir.path().join("schemas");
        let file = write_schema_file(temp_dir.path());

        add(&schema_dir, &file).unwrap();
        assert!(schema_dir.join("schema_users.json").exists());

        let mut registry = SchemaRegistry::new(&schema_dir);
        registry.load_all().unwrap();
        assert!(registry.exists("users"));
    }

    #[test]
    fn test_add_refuses_duplicate_name() {
        let temp_dir = TempDir::new().unwrap();
        let schema_dir = temp_dir.path().join("schemas");
        let file = write_schema_file(temp_dir.path());

        add(&schema_dir, &file).unwrap();

        let result = add(&schema_dir, &file);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), "SCHEMA_ALREADY_REGISTERED");
    }
}
