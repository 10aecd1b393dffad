//! # Schema Bootstrap
//!
//! The store document declares its schema next to its rows:
//!
//! ```json
//! {
//!   "schema": {
//!     "generation": 1,
//!     "tables": [
//!       { "name": "projects", "key": "id", "indexes": ["updatedAt", "name"] },
//!       { "name": "versions", "key": "id", "indexes": ["projectId", "timestamp"] }
//!     ]
//!   },
//!   "projects": [ ... ],
//!   "versions": [ ... ]
//! }
//! ```
//!
//! The declaration is written once, when the document is first created. Every
//! later open checks it against [`current_schema`] and rebuilds the in-memory indexes
//! from the rows. There is exactly one schema generation; a document declaring
//! any other generation is refused rather than migrated.

use super::backend::StorageBackend;
use super::table::Tables;
use crate::error::{Result, StoreError};
use crate::model::{Project, ProjectVersion};
use serde::{Deserialize, Serialize};

pub const SCHEMA_GENERATION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub key: String,
    pub indexes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDecl {
    pub generation: u32,
    pub tables: Vec<TableSchema>,
}

/// The schema this build creates and accepts.
pub fn current_schema() -> SchemaDecl {
    SchemaDecl {
        generation: SCHEMA_GENERATION,
        tables: vec![
            TableSchema {
                name: "projects".into(),
                key: "id".into(),
                indexes: vec!["updatedAt".into(), "name".into()],
            },
            TableSchema {
                name: "versions".into(),
                key: "id".into(),
                indexes: vec!["projectId".into(), "timestamp".into()],
            },
        ],
    }
}

#[derive(Deserialize)]
struct StoreDocument {
    schema: SchemaDecl,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    versions: Vec<ProjectVersion>,
}

#[derive(Serialize)]
struct StoreDocumentRef<'a> {
    schema: SchemaDecl,
    projects: Vec<&'a Project>,
    versions: Vec<&'a ProjectVersion>,
}

/// Serialize both tables into a store document.
pub fn encode(tables: &Tables) -> Result<String> {
    let doc = StoreDocumentRef {
        schema: current_schema(),
        projects: tables.projects.rows().collect(),
        versions: tables.versions.rows().collect(),
    };
    serde_json::to_string_pretty(&doc).map_err(StoreError::Serialization)
}

/// Parse a store document, validating the schema and rebuilding indexes.
pub fn decode(contents: &str) -> std::result::Result<Tables, String> {
    let doc: StoreDocument =
        serde_json::from_str(contents).map_err(|e| format!("corrupted store document: {e}"))?;

    if doc.schema.generation != SCHEMA_GENERATION {
        return Err(format!(
            "unsupported schema generation {} (expected {})",
            doc.schema.generation, SCHEMA_GENERATION
        ));
    }
    if doc.schema != current_schema() {
        return Err("table declarations do not match schema generation 1".to_string());
    }

    let mut tables = Tables::default();
    for project in doc.projects {
        let id = project.id.clone();
        if tables.projects.put(project).is_some() {
            return Err(format!("duplicate project id {id}"));
        }
    }
    for version in doc.versions {
        let id = version.id.clone();
        if tables.versions.put(version).is_some() {
            return Err(format!("duplicate version id {id}"));
        }
    }
    Ok(tables)
}

/// Open the store behind `backend`, creating it on first use.
///
/// Any failure is reported as [`StoreError::Open`] and leaves the backend
/// untouched, so the caller can simply try again.
pub fn bootstrap(backend: &dyn StorageBackend) -> Result<Tables> {
    let location = backend.location().display().to_string();

    let existing = backend
        .read_store()
        .map_err(|e| StoreError::open(&location, e))?;

    match existing {
        Some(contents) => {
            let tables = decode(&contents).map_err(|reason| StoreError::open(&location, reason))?;
            tracing::debug!(
                location = %location,
                projects = tables.projects.len(),
                versions = tables.versions.len(),
                "Loaded store"
            );
            Ok(tables)
        }
        None => {
            let tables = Tables::default();
            let contents = encode(&tables).map_err(|e| StoreError::open(&location, e))?;
            backend
                .write_store(&contents)
                .map_err(|e| StoreError::open(&location, e))?;
            tracing::info!(location = %location, generation = SCHEMA_GENERATION, "Created store");
            Ok(tables)
        }
    }
}
