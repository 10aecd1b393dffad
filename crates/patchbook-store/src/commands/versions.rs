use crate::error::{Result, StoreError};
use crate::id::new_id;
use crate::model::{Id, ProjectVersion};
use crate::store::Engine;

/// Append a snapshot of `code` to the history of `project_id`.
///
/// The project reference is not checked unless the store runs with
/// `strict_references`.
pub fn save_version(
    engine: &mut Engine,
    project_id: &Id,
    code: String,
    label: Option<String>,
) -> Result<ProjectVersion> {
    if engine.options().strict_references && !engine.tables().projects.contains(project_id) {
        return Err(StoreError::UnknownProject(project_id.clone()));
    }

    let now = engine.now();
    let version = ProjectVersion {
        id: new_id(now),
        project_id: project_id.clone(),
        code,
        timestamp: now,
        label: label.filter(|l| !l.trim().is_empty()),
    };

    engine.write(|tx| {
        tx.put_version(version.clone());
        Ok(())
    })?;
    tracing::debug!(project_id = %project_id, version_id = %version.id, "Saved version");
    Ok(version)
}

/// Up to `limit` versions of one project, newest first.
///
/// Stops scanning the index as soon as `limit` versions are collected.
pub fn list_versions(engine: &Engine, project_id: &Id, limit: usize) -> Vec<ProjectVersion> {
    engine
        .tables()
        .versions
        .for_project_newest_first(project_id)
        .take(limit)
        .cloned()
        .collect()
}

pub fn get_version(engine: &Engine, id: &Id) -> Option<ProjectVersion> {
    engine.tables().versions.get(id).cloned()
}

/// Up to `limit` versions across all projects, newest first.
pub fn recent_versions(engine: &Engine, limit: usize) -> Vec<ProjectVersion> {
    engine
        .tables()
        .versions
        .newest_first()
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::projects;
    use crate::model::ProjectDraft;
    use crate::test_utils::TestEngine;

    #[test]
    fn test_save_version_stamps_time_and_label() {
        let mut env = TestEngine::new();
        let project_id = Id::from("p1");
        let version = save_version(
            &mut env.engine,
            &project_id,
            "osc()".into(),
            Some("before refactor".into()),
        )
        .unwrap();

        assert!(!version.id.is_empty());
        assert_eq!(version.project_id, project_id);
        assert_eq!(version.label.as_deref(), Some("before refactor"));
        assert_eq!(get_version(&env.engine, &version.id), Some(version));
    }

    #[test]
    fn test_blank_label_is_dropped() {
        let mut env = TestEngine::new();
        let version =
            save_version(&mut env.engine, &Id::from("p1"), "x".into(), Some("  ".into())).unwrap();
        assert_eq!(version.label, None);
    }

    #[test]
    fn test_list_versions_newest_first_with_limit() {
        let mut env = TestEngine::new();
        let project_id = Id::from("p1");
        for i in 0..5 {
            save_version(&mut env.engine, &project_id, format!("v{i}"), None).unwrap();
        }
        save_version(&mut env.engine, &Id::from("other"), "x".into(), None).unwrap();

        let versions = list_versions(&env.engine, &project_id, 3);
        let codes: Vec<&str> = versions.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec!["v4", "v3", "v2"]);
        assert!(versions
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp));

        assert_eq!(list_versions(&env.engine, &project_id, 100).len(), 5);
        assert!(list_versions(&env.engine, &project_id, 0).is_empty());
    }

    #[test]
    fn test_list_versions_for_unknown_project_is_empty() {
        let env = TestEngine::new();
        assert!(list_versions(&env.engine, &Id::from("nobody"), 20).is_empty());
    }

    #[test]
    fn test_unknown_project_allowed_by_default() {
        let mut env = TestEngine::new();
        assert!(save_version(&mut env.engine, &Id::from("ghost"), "x".into(), None).is_ok());
    }

    #[test]
    fn test_strict_references_rejects_unknown_project() {
        let mut env = TestEngine::strict();
        let err =
            save_version(&mut env.engine, &Id::from("ghost"), "x".into(), None).unwrap_err();
        assert!(matches!(err, StoreError::UnknownProject(_)));

        let project = projects::save(&mut env.engine, ProjectDraft::new("Sine", "")).unwrap();
        assert!(save_version(&mut env.engine, &project.id, "x".into(), None).is_ok());
    }

    #[test]
    fn test_recent_versions_spans_projects() {
        let mut env = TestEngine::new();
        save_version(&mut env.engine, &Id::from("a"), "a1".into(), None).unwrap();
        save_version(&mut env.engine, &Id::from("b"), "b1".into(), None).unwrap();
        save_version(&mut env.engine, &Id::from("a"), "a2".into(), None).unwrap();

        let codes: Vec<String> = recent_versions(&env.engine, 2)
            .into_iter()
            .map(|v| v.code)
            .collect();
        assert_eq!(codes, vec!["a2", "b1"]);
    }
}
