//! # Retention
//!
//! Version history grows with every snapshot. Cleanup bounds it to the
//! `keep` most recent versions per project.
//!
//! ## Procedure
//!
//! For each project (in `list` order):
//!
//! 1. Fetch up to `scan_limit` of its versions, newest first.
//! 2. Everything after the first `keep` of those is excess.
//! 3. Delete the excess in one transaction.
//!
//! Each project's trim is atomic; the pass as a whole is not. An error stops
//! the pass with [`StoreError::CleanupInterrupted`], which carries how many
//! versions earlier projects already lost, so "nothing to clean" and "failed
//! before cleaning anything" are distinguishable.
//!
//! ## Scan Limit
//!
//! Versions older than the `scan_limit`-th are not looked at in a single pass.
//! A project with a pathological history needs several passes to get down to
//! `keep`; each pass costs at most `scan_limit` rows of memory per project.
//!
//! [`StoreError::CleanupInterrupted`]: crate::error::StoreError::CleanupInterrupted

use crate::error::Result;
use crate::model::Id;
use crate::store::Engine;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCleanup {
    pub project_id: Id,
    pub deleted: usize,
}

/// Outcome of a completed cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Versions deleted across all projects.
    pub deleted: usize,
    /// Projects that lost at least one version.
    pub projects: Vec<ProjectCleanup>,
}

impl CleanupReport {
    pub fn record(&mut self, project_id: Id, deleted: usize) {
        if deleted == 0 {
            return;
        }
        self.deleted += deleted;
        self.projects.push(ProjectCleanup {
            project_id,
            deleted,
        });
    }
}

/// Trim one project's history to its `keep` newest versions.
///
/// Returns the number of versions deleted.
pub fn trim_project(
    engine: &mut Engine,
    project_id: &Id,
    keep: usize,
    scan_limit: usize,
) -> Result<usize> {
    let excess: Vec<Id> = engine
        .tables()
        .versions
        .for_project_newest_first(project_id)
        .take(scan_limit)
        .skip(keep)
        .map(|v| v.id.clone())
        .collect();

    if excess.is_empty() {
        return Ok(0);
    }

    let deleted = engine.write(|tx| {
        let mut deleted = 0;
        for id in &excess {
            if tx.delete_version(id).is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    })?;
    tracing::debug!(project_id = %project_id, deleted, "Trimmed version history");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::versions::{list_versions, save_version};
    use crate::test_utils::TestEngine;

    fn seed(env: &mut TestEngine, project_id: &Id, count: usize) {
        for i in 0..count {
            save_version(&mut env.engine, project_id, format!("v{i}"), None).unwrap();
        }
    }

    #[test]
    fn test_trim_keeps_newest() {
        let mut env = TestEngine::new();
        let project_id = Id::from("p1");
        seed(&mut env, &project_id, 15);

        let deleted = trim_project(&mut env.engine, &project_id, 10, 1000).unwrap();
        assert_eq!(deleted, 5);

        let codes: Vec<String> = list_versions(&env.engine, &project_id, 1000)
            .into_iter()
            .map(|v| v.code)
            .collect();
        let expected: Vec<String> = (5..15).rev().map(|i| format!("v{i}")).collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn test_trim_under_limit_is_noop() {
        let mut env = TestEngine::new();
        let project_id = Id::from("p1");
        seed(&mut env, &project_id, 3);
        let writes = env.backend.write_count();

        assert_eq!(trim_project(&mut env.engine, &project_id, 10, 1000).unwrap(), 0);
        assert_eq!(env.backend.write_count(), writes);
    }

    #[test]
    fn test_trim_respects_scan_limit() {
        let mut env = TestEngine::new();
        let project_id = Id::from("p1");
        seed(&mut env, &project_id, 12);

        // Only the newest 6 are examined; 4 of those are beyond keep
        assert_eq!(trim_project(&mut env.engine, &project_id, 2, 6).unwrap(), 4);
        assert_eq!(list_versions(&env.engine, &project_id, 100).len(), 8);

        // A second pass gets further
        assert_eq!(trim_project(&mut env.engine, &project_id, 2, 6).unwrap(), 4);
        assert_eq!(list_versions(&env.engine, &project_id, 100).len(), 4);
    }

    #[test]
    fn test_trim_to_zero_removes_everything() {
        let mut env = TestEngine::new();
        let project_id = Id::from("p1");
        seed(&mut env, &project_id, 4);
        assert_eq!(trim_project(&mut env.engine, &project_id, 0, 1000).unwrap(), 4);
        assert!(list_versions(&env.engine, &project_id, 100).is_empty());
    }

    #[test]
    fn test_failed_trim_is_atomic() {
        let mut env = TestEngine::new();
        let project_id = Id::from("p1");
        seed(&mut env, &project_id, 6);
        env.backend.set_simulate_write_error(true);

        assert!(trim_project(&mut env.engine, &project_id, 2, 1000).is_err());
        assert_eq!(list_versions(&env.engine, &project_id, 100).len(), 6);
    }

    #[test]
    fn test_report_skips_untouched_projects() {
        let mut report = CleanupReport::default();
        report.record(Id::from("a"), 0);
        report.record(Id::from("b"), 3);
        report.record(Id::from("c"), 2);
        assert_eq!(report.deleted, 5);
        assert_eq!(report.projects.len(), 2);
    }
}
