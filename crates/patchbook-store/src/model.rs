//! # Domain Model
//!
//! The store keeps two kinds of records:
//!
//! - [`Project`]: a named piece of user code plus an optional description.
//! - [`ProjectVersion`]: an append-only snapshot of a project's code, taken at a
//!   point in time and optionally labelled (e.g. "before refactor").
//!
//! A project owns its versions through [`ProjectVersion::project_id`]. The reference
//! is logical only: nothing stops a version from naming a project that does not
//! exist (unless the store runs with `strict_references`).
//!
//! ## Timestamps
//!
//! All timestamps are milliseconds since the Unix epoch ([`Timestamp`]). For a
//! given project `created_at` is fixed at the first save and `updated_at` moves
//! forward on every save, so `updated_at >= created_at` always holds.
//!
//! ## Drafts
//!
//! [`ProjectDraft`] carries the business fields of a project without identity.
//! It is what callers hand to `save`, and what `import` produces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// Opaque record identifier.
///
/// Generated ids are time-prefixed (see [`crate::id`]) so they sort roughly by
/// creation, but nothing relies on that ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Id,
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// The draft fields of this project, without identity or timestamps.
    pub fn to_draft(&self) -> ProjectDraft {
        ProjectDraft {
            id: None,
            name: self.name.clone(),
            code: self.code.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectVersion {
    pub id: Id,
    pub project_id: Id,
    pub code: String,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Input to `save`: a project's business fields with an optional identity.
///
/// With `id: None` the save creates a new project. With `id: Some(..)` the save
/// replaces the project with that id, keeping its original `created_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub id: Option<Id>,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            code: code.into(),
            description: None,
        }
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Aggregate row counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub project_count: usize,
    pub version_count: usize,
}
