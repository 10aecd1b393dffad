//! # Export Format
//!
//! A project exports to a pretty-printed JSON document:
//!
//! ```json
//! {
//!   "name": "Sine",
//!   "code": "osc(440)",
//!   "description": "A plain sine",
//!   "exportedAt": "2026-10-14T09:30:00.000Z",
//!   "version": "1.0"
//! }
//! ```
//!
//! Export is content only: no id, no timestamps of the project itself, no
//! version history. `description` is omitted when the project has none.

use crate::error::{Result, StoreError};
use crate::model::{Project, Timestamp};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub exported_at: String,
    pub version: String,
}

/// Serialize `project` for export, stamped with `exported_at`.
///
/// Fails with [`StoreError::Storage`] when `exported_at` is outside the range
/// of representable dates.
pub fn run(project: &Project, exported_at: Timestamp) -> Result<String> {
    let doc = ExportDocument {
        name: project.name.clone(),
        code: project.code.clone(),
        description: project.description.clone(),
        exported_at: iso_timestamp(exported_at)?,
        version: FORMAT_VERSION.to_string(),
    };
    serde_json::to_string_pretty(&doc).map_err(StoreError::Serialization)
}

fn iso_timestamp(millis: Timestamp) -> Result<String> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| StoreError::Storage(format!("Export timestamp {millis} is out of range")))
}

/// Suggested file name for an exported project.
pub fn file_name(project: &Project) -> String {
    let safe: String = project
        .name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe = safe.trim_matches('_');
    if safe.is_empty() {
        "project.json".to_string()
    } else {
        format!("{safe}.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Id;

    fn project(description: Option<&str>) -> Project {
        Project {
            id: Id::from("secret-id"),
            name: "Sine Wave".into(),
            code: "osc(440)".into(),
            description: description.map(str::to_string),
            created_at: 1,
            updated_at: 2,
        }
    }

    #[test]
    fn test_export_shape() {
        let text = run(&project(Some("plain")), 1_700_000_000_000).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(json["name"], "Sine Wave");
        assert_eq!(json["code"], "osc(440)");
        assert_eq!(json["description"], "plain");
        assert_eq!(json["exportedAt"], "2023-11-14T22:13:20.000Z");
        assert_eq!(json["version"], "1.0");
    }

    #[test]
    fn test_export_omits_identity_and_history() {
        let text = run(&project(None), 0).unwrap();
        assert!(!text.contains("secret-id"));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("createdAt").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_out_of_range_timestamp_is_an_error() {
        let err = run(&project(None), i64::MAX).unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_file_name_is_sanitized() {
        assert_eq!(file_name(&project(None)), "Sine_Wave.json");
        let mut odd = project(None);
        odd.name = "///".into();
        assert_eq!(file_name(&odd), "project.json");
    }
}
