//! Named schema registry backed by a directory of JSON files
//!
//! Schemas are stored one per file at `<schema_dir>/schema_<name>.json`.
//! Registered names are immutable: registering or saving over an existing
//! name is refused, so a schema can only ever mean one thing. Malformed
//! files fail loading outright rather than being skipped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::Schema;

// ============================================================
// Errors
// ============================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// Lookup by a name nothing was registered under
    #[error("schema '{name}' not found")]
    NotFound { name: String },

    /// Register or save over a name that is already taken
    #[error("schema '{name}' is already registered")]
    AlreadyRegistered { name: String },

    /// Unreadable, unparseable or structurally invalid schema
    #[error("malformed schema '{path}': {reason}")]
    Malformed { path: String, reason: String },

    /// Filesystem failure outside a specific schema file
    #[error("io error at '{path}': {reason}")]
    Io { path: String, reason: String },
}

impl RegistryError {
    /// Returns the stable code string for programmatic matching.
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::NotFound { .. } => "SCHEMA_NOT_FOUND",
            RegistryError::AlreadyRegistered { .. } => "SCHEMA_ALREADY_REGISTERED",
            RegistryError::Malformed { .. } => "SCHEMA_MALFORMED",
            RegistryError::Io { .. } => "SCHEMA_IO",
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

// ============================================================
// Named Schemas
// ============================================================

/// A schema with the name it is registered under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSchema {
    /// Registry name, also the basis of the file name on disk
    pub name: String,
    /// The schema itself
    pub schema: Schema,
}

impl NamedSchema {
    pub fn new(name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        NamedSchema {
            name: name.into(),
            schema: schema.into(),
        }
    }
}

// ============================================================
// Registry
// ============================================================

/// In-memory registry of named schemas with a directory behind it.
pub struct SchemaRegistry {
    /// Directory containing schema files
    schema_dir: PathBuf,
    /// Registered schemas by name
    schemas: HashMap<String, NamedSchema>,
}

impl SchemaRegistry {
    /// Creates an empty registry over the given directory. Nothing is
    /// loaded until `load_all` is called.
    pub fn new(schema_dir: &Path) -> Self {
        SchemaRegistry {
            schema_dir: schema_dir.to_path_buf(),
            schemas: HashMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every schema file from the schema directory.
    ///
    /// Creates the directory when it does not exist yet. Files without a
    /// `.json` extension are skipped; a `.json` file that does not hold a
    /// well-formed named schema fails the whole load.
    ///
    /// Returns the number of schemas loaded.
    pub fn load_all(&mut self) -> RegistryResult<usize> {
        if !self.schema_dir.exists() {
            fs::create_dir_all(&self.schema_dir).map_err(|e| RegistryError::Io {
                path: self.schema_dir.display().to_string(),
                reason: format!("failed to create schema directory: {}", e),
            })?;
            return Ok(0);
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| RegistryError::Io {
            path: self.schema_dir.display().to_string(),
            reason: format!("failed to read schema directory: {}", e),
        })?;

        let mut loaded = 0;
        for entry in entries {
            let entry = entry.map_err(|e| RegistryError::Io {
                path: self.schema_dir.display().to_string(),
                reason: format!("failed to read directory entry: {}", e),
            })?;

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            self.load_file(&path)?;
            loaded += 1;
        }

        Ok(loaded)
    }

    /// Loads a single schema file into the registry.
    fn load_file(&mut self, path: &Path) -> RegistryResult<()> {
        let content = fs::read_to_string(path).map_err(|e| RegistryError::Malformed {
            path: path.display().to_string(),
            reason: format!("failed to read file: {}", e),
        })?;

        let named: NamedSchema =
            serde_json::from_str(&content).map_err(|e| RegistryError::Malformed {
                path: path.display().to_string(),
                reason: format!("invalid JSON: {}", e),
            })?;

        check_name(&named.name).map_err(|reason| RegistryError::Malformed {
            path: path.display().to_string(),
            reason,
        })?;

        named
            .schema
            .validate_structure()
            .map_err(|reason| RegistryError::Malformed {
                path: path.display().to_string(),
                reason,
            })?;

        if self.schemas.contains_key(&named.name) {
            return Err(RegistryError::AlreadyRegistered { name: named.name });
        }

        self.schemas.insert(named.name.clone(), named);
        Ok(())
    }

    /// Registers a schema directly, without touching disk.
    pub fn register(&mut self, named: NamedSchema) -> RegistryResult<()> {
        check_name(&named.name).map_err(|reason| RegistryError::Malformed {
            path: "<in-memory>".to_string(),
            reason,
        })?;

        named
            .schema
            .validate_structure()
            .map_err(|reason| RegistryError::Malformed {
                path: "<in-memory>".to_string(),
                reason,
            })?;

        if self.schemas.contains_key(&named.name) {
            return Err(RegistryError::AlreadyRegistered { name: named.name });
        }

        self.schemas.insert(named.name.clone(), named);
        Ok(())
    }

    /// Looks up a schema by name.
    pub fn get(&self, name: &str) -> Option<&NamedSchema> {
        self.schemas.get(name)
    }

    /// Like `get`, but a missing name is an error.
    pub fn require(&self, name: &str) -> RegistryResult<&NamedSchema> {
        self.get(name).ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })
    }

    /// True when a schema with the given name is registered.
    pub fn exists(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Writes a schema to its file in the schema directory.
    ///
    /// Refuses to overwrite an existing file. Returns the path written.
    pub fn save(&self, named: &NamedSchema) -> RegistryResult<PathBuf> {
        check_name(&named.name).map_err(|reason| RegistryError::Malformed {
            path: "<in-memory>".to_string(),
            reason,
        })?;

        let path = self.schema_dir.join(format!("schema_{}.json", named.name));
        if path.exists() {
            return Err(RegistryError::AlreadyRegistered {
                name: named.name.clone(),
            });
        }

        if !self.schema_dir.exists() {
            fs::create_dir_all(&self.schema_dir).map_err(|e| RegistryError::Io {
                path: self.schema_dir.display().to_string(),
                reason: format!("failed to create schema directory: {}", e),
            })?;
        }

        let content =
            serde_json::to_string_pretty(named).map_err(|e| RegistryError::Malformed {
                path: path.display().to_string(),
                reason: format!("failed to serialize schema: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| RegistryError::Io {
            path: path.display().to_string(),
            reason: format!("failed to write file: {}", e),
        })?;

        Ok(path)
    }
}

/// Names become file names, so they must be non-empty and path-safe.
fn check_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("schema name cannot be empty".into());
    }
    if name.contains('/') || name.contains('\\') {
        return Err("schema name cannot contain path separators".into());
    }
    Ok(())
}
