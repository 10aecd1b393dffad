use crate::error::Result;
use crate::model::Id;
use crate::store::Engine;

/// Outcome of a cascade delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Whether a project row existed and was removed.
    pub project_removed: bool,
    /// Versions removed along with it.
    pub versions_removed: usize,
}

/// Delete a project together with every version that references it.
///
/// Both deletions happen in one transaction: after a failure the project and
/// all of its versions are still present. Versions are swept even when the
/// project row itself is already gone, which clears orphans left by
/// unchecked `save_version` calls.
pub fn run(engine: &mut Engine, id: &Id) -> Result<DeleteOutcome> {
    let version_ids = engine.tables().versions.ids_for_project(id);

    let outcome = engine.write(|tx| {
        let project_removed = tx.delete_project(id).is_some();
        let mut versions_removed = 0;
        for version_id in &version_ids {
            if tx.delete_version(version_id).is_some() {
                versions_removed += 1;
            }
        }
        Ok(DeleteOutcome {
            project_removed,
            versions_removed,
        })
    })?;

    tracing::info!(
        project_id = %id,
        project_removed = outcome.project_removed,
        versions_removed = outcome.versions_removed,
        "Deleted project"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::projects;
    use crate::commands::versions::{list_versions, save_version};
    use crate::model::ProjectDraft;
    use crate::test_utils::TestEngine;

    #[test]
    fn test_cascade_removes_project_and_versions() {
        let mut env = TestEngine::new();
        let project = projects::save(&mut env.engine, ProjectDraft::new("Sine", "")).unwrap();
        let other = projects::save(&mut env.engine, ProjectDraft::new("Delay", "")).unwrap();
        for i in 0..4 {
            save_version(&mut env.engine, &project.id, format!("v{i}"), None).unwrap();
        }
        save_version(&mut env.engine, &other.id, "keep".into(), None).unwrap();

        let outcome = run(&mut env.engine, &project.id).unwrap();

        assert_eq!(
            outcome,
            DeleteOutcome {
                project_removed: true,
                versions_removed: 4
            }
        );
        assert!(projects::get(&env.engine, &project.id).is_none());
        assert!(list_versions(&env.engine, &project.id, 100).is_empty());
        assert_eq!(list_versions(&env.engine, &other.id, 100).len(), 1);
    }

    #[test]
    fn test_cascade_with_no_versions() {
        let mut env = TestEngine::new();
        let project = projects::save(&mut env.engine, ProjectDraft::new("Sine", "")).unwrap();
        let outcome = run(&mut env.engine, &project.id).unwrap();
        assert!(outcome.project_removed);
        assert_eq!(outcome.versions_removed, 0);
    }

    #[test]
    fn test_deleting_missing_project_is_ok() {
        let mut env = TestEngine::new();
        let outcome = run(&mut env.engine, &Id::from("missing")).unwrap();
        assert_eq!(outcome, DeleteOutcome::default());
    }

    #[test]
    fn test_cascade_sweeps_orphan_versions() {
        let mut env = TestEngine::new();
        let ghost = Id::from("ghost");
        save_version(&mut env.engine, &ghost, "x".into(), None).unwrap();

        let outcome = run(&mut env.engine, &ghost).unwrap();
        assert!(!outcome.project_removed);
        assert_eq!(outcome.versions_removed, 1);
    }

    #[test]
    fn test_failed_cascade_leaves_everything_in_place() {
        let mut env = TestEngine::new();
        let project = projects::save(&mut env.engine, ProjectDraft::new("Sine", "")).unwrap();
        for i in 0..3 {
            save_version(&mut env.engine, &project.id, format!("v{i}"), None).unwrap();
        }
        let before = env.backend.document();
        env.backend.set_simulate_write_error(true);

        assert!(run(&mut env.engine, &project.id).is_err());

        assert_eq!(projects::get(&env.engine, &project.id), Some(project.clone()));
        assert_eq!(list_versions(&env.engine, &project.id, 100).len(), 3);
        assert_eq!(env.backend.document(), before);
    }
}
