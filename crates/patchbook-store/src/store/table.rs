//! Logical tables with their secondary indexes.
//!
//! Rows live in a `HashMap` keyed by primary key. Every mutation goes through
//! `put`/`delete`, which keep the ordered indexes in step with the rows:
//!
//! | Table      | Index        | Shape                                   |
//! |------------|--------------|-----------------------------------------|
//! | `projects` | `updatedAt`  | `BTreeSet<(updated_at, id)>`            |
//! | `projects` | `name`       | `BTreeMap<name, BTreeSet<id>>`          |
//! | `versions` | `projectId`  | `BTreeMap<project_id, BTreeSet<(timestamp, id)>>` |
//! | `versions` | `timestamp`  | `BTreeSet<(timestamp, id)>`             |
//!
//! Ties on time order by id.

use crate::model::{Id, Project, ProjectVersion, Timestamp};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Default)]
pub struct ProjectTable {
    rows: HashMap<Id, Project>,
    by_updated_at: BTreeSet<(Timestamp, Id)>,
    by_name: BTreeMap<String, BTreeSet<Id>>,
}

impl ProjectTable {
    pub fn get(&self, id: &Id) -> Option<&Project> {
        self.rows.get(id)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.rows.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Insert or replace a row, returning the row it replaced.
    pub fn put(&mut self, project: Project) -> Option<Project> {
        let prior = self.delete(&project.id);
        self.by_updated_at
            .insert((project.updated_at, project.id.clone()));
        self.by_name
            .entry(project.name.clone())
            .or_default()
            .insert(project.id.clone());
        self.rows.insert(project.id.clone(), project);
        prior
    }

    pub fn delete(&mut self, id: &Id) -> Option<Project> {
        let prior = self.rows.remove(id)?;
        self.by_updated_at
            .remove(&(prior.updated_at, prior.id.clone()));
        if let Some(ids) = self.by_name.get_mut(&prior.name) {
            ids.remove(id);
            if ids.is_empty() {
                self.by_name.remove(&prior.name);
            }
        }
        Some(prior)
    }

    /// Walk the `updatedAt` index, most recently touched first.
    pub fn newest_first(&self) -> impl Iterator<Item = &Project> + '_ {
        self.by_updated_at
            .iter()
            .rev()
            .filter_map(move |(_, id)| self.rows.get(id))
    }

    /// Exact-name lookup through the `name` index.
    pub fn named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Project> + 'a {
        self.by_name
            .get(name)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(move |id| self.rows.get(id))
    }

    /// Rows in index order, for serialization.
    pub fn rows(&self) -> impl Iterator<Item = &Project> + '_ {
        self.by_updated_at
            .iter()
            .filter_map(move |(_, id)| self.rows.get(id))
    }
}

#[derive(Debug, Default)]
pub struct VersionTable {
    rows: HashMap<Id, ProjectVersion>,
    by_project: BTreeMap<Id, BTreeSet<(Timestamp, Id)>>,
    by_timestamp: BTreeSet<(Timestamp, Id)>,
}

impl VersionTable {
    pub fn get(&self, id: &Id) -> Option<&ProjectVersion> {
        self.rows.get(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn put(&mut self, version: ProjectVersion) -> Option<ProjectVersion> {
        let prior = self.delete(&version.id);
        self.by_project
            .entry(version.project_id.clone())
            .or_default()
            .insert((version.timestamp, version.id.clone()));
        self.by_timestamp
            .insert((version.timestamp, version.id.clone()));
        self.rows.insert(version.id.clone(), version);
        prior
    }

    pub fn delete(&mut self, id: &Id) -> Option<ProjectVersion> {
        let prior = self.rows.remove(id)?;
        let key = (prior.timestamp, prior.id.clone());
        if let Some(keys) = self.by_project.get_mut(&prior.project_id) {
            keys.remove(&key);
            if keys.is_empty() {
                self.by_project.remove(&prior.project_id);
            }
        }
        self.by_timestamp.remove(&key);
        Some(prior)
    }

    /// Range-scan the `projectId` index for one project, newest first.
    ///
    /// The iterator is lazy: taking `n` items touches `n` index entries.
    pub fn for_project_newest_first<'a>(
        &'a self,
        project_id: &Id,
    ) -> impl Iterator<Item = &'a ProjectVersion> + 'a {
        self.by_project
            .get(project_id)
            .into_iter()
            .flat_map(|keys| keys.iter().rev())
            .filter_map(move |(_, id)| self.rows.get(id))
    }

    /// Ids of every version belonging to `project_id`.
    pub fn ids_for_project(&self, project_id: &Id) -> Vec<Id> {
        self.by_project
            .get(project_id)
            .map(|keys| keys.iter().map(|(_, id)| id.clone()).collect())
            .unwrap_or_default()
    }

    /// Walk the `timestamp` index across all projects, newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &ProjectVersion> + '_ {
        self.by_timestamp
            .iter()
            .rev()
            .filter_map(move |(_, id)| self.rows.get(id))
    }

    pub fn rows(&self) -> impl Iterator<Item = &ProjectVersion> + '_ {
        self.by_timestamp
            .iter()
            .filter_map(move |(_, id)| self.rows.get(id))
    }
}

/// Both tables of the store.
#[derive(Debug, Default)]
pub struct Tables {
    pub projects: ProjectTable,
    pub versions: VersionTable,
}
