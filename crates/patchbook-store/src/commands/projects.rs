use crate::error::{Result, StoreError};
use crate::id::new_id;
use crate::model::{Id, Project, ProjectDraft};
use crate::store::Engine;

/// Create or replace a project.
///
/// - No id: a fresh id is minted and `created_at = now`.
/// - Known id: `created_at` is preserved, everything else is replaced.
/// - Unknown id: treated as a new project under that id.
///
/// `updated_at` is always `now`. A blank description is stored as none.
pub fn save(engine: &mut Engine, draft: ProjectDraft) -> Result<Project> {
    if draft.name.trim().is_empty() {
        return Err(StoreError::Invalid("Name cannot be empty".to_string()));
    }

    let now = engine.now();
    let id = match draft.id {
        Some(id) if !id.is_empty() => id,
        _ => new_id(now),
    };
    let created_at = engine
        .tables()
        .projects
        .get(&id)
        .map(|existing| existing.created_at)
        .unwrap_or(now);

    let project = Project {
        id,
        name: draft.name,
        code: draft.code,
        description: draft.description.filter(|d| !d.trim().is_empty()),
        created_at,
        updated_at: now.max(created_at),
    };

    engine.write(|tx| {
        tx.put_project(project.clone());
        Ok(())
    })?;
    tracing::debug!(project_id = %project.id, "Saved project");
    Ok(project)
}

pub fn get(engine: &Engine, id: &Id) -> Option<Project> {
    engine.tables().projects.get(id).cloned()
}

/// All projects with exactly this name, via the name index.
pub fn find_by_name(engine: &Engine, name: &str) -> Vec<Project> {
    engine.tables().projects.named(name).cloned().collect()
}

/// Every project, most recently updated first.
pub fn list(engine: &Engine) -> Vec<Project> {
    engine.tables().projects.newest_first().cloned().collect()
}
