use crate::model::Project;
use crate::store::Engine;

use super::projects;

/// Case-insensitive substring match on name or description.
///
/// Filters the full recency listing in memory, so results keep `list` order
/// and the cost is linear in the number of projects.
pub fn run(engine: &Engine, query: &str) -> Vec<Project> {
    let needle = query.to_lowercase();
    projects::list(engine)
        .into_iter()
        .filter(|project| matches(project, &needle))
        .collect()
}

fn matches(project: &Project, needle: &str) -> bool {
    if project.name.to_lowercase().contains(needle) {
        return true;
    }
    project
        .description
        .as_deref()
        .is_some_and(|d| d.to_lowercase().contains(needle))
}

pub fn project_count(engine: &Engine) -> usize {
    engine.tables().projects.len()
}

pub fn version_count(engine: &Engine) -> usize {
    engine.tables().versions.len()
}
