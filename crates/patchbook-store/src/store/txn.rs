use super::table::Tables;
use crate::model::{Id, Project, ProjectVersion};

enum Undo {
    Project { id: Id, prior: Option<Project> },
    Version { id: Id, prior: Option<ProjectVersion> },
}

/// A read-write transaction spanning both tables.
///
/// Mutations are applied to the live tables immediately and recorded in an
/// undo log. If the transaction body fails, or its commit cannot be persisted,
/// the engine calls [`Transaction::rollback`] and the tables return to exactly
/// the state they had when the transaction began.
pub struct Transaction<'a> {
    tables: &'a mut Tables,
    undo: Vec<Undo>,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(tables: &'a mut Tables) -> Self {
        Self {
            tables,
            undo: Vec::new(),
        }
    }

    pub fn tables(&self) -> &Tables {
        &*self.tables
    }

    pub fn is_dirty(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn put_project(&mut self, project: Project) {
        let id = project.id.clone();
        let prior = self.tables.projects.put(project);
        self.undo.push(Undo::Project { id, prior });
    }

    pub fn delete_project(&mut self, id: &Id) -> Option<Project> {
        let prior = self.tables.projects.delete(id)?;
        self.undo.push(Undo::Project {
            id: id.clone(),
            prior: Some(prior.clone()),
        });
        Some(prior)
    }

    pub fn put_version(&mut self, version: ProjectVersion) {
        let id = version.id.clone();
        let prior = self.tables.versions.put(version);
        self.undo.push(Undo::Version { id, prior });
    }

    pub fn delete_version(&mut self, id: &Id) -> Option<ProjectVersion> {
        let prior = self.tables.versions.delete(id)?;
        self.undo.push(Undo::Version {
            id: id.clone(),
            prior: Some(prior.clone()),
        });
        Some(prior)
    }

    /// Replay the undo log, newest entry first.
    pub(crate) fn rollback(self) {
        let Transaction { tables, undo } = self;
        for entry in undo.into_iter().rev() {
            match entry {
                Undo::Project { id, prior } => match prior {
                    Some(project) => {
                        tables.projects.put(project);
                    }
                    None => {
                        tables.projects.delete(&id);
                    }
                },
                Undo::Version { id, prior } => match prior {
                    Some(version) => {
                        tables.versions.put(version);
                    }
                    None => {
                        tables.versions.delete(&id);
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, name: &str, updated_at: i64) -> Project {
        Project {
            id: Id::from(id),
            name: name.into(),
            code: String::new(),
            description: None,
            created_at: 0,
            updated_at,
        }
    }

    #[test]
    fn test_rollback_restores_replaced_and_deleted_rows() {
        let mut tables = Tables::default();
        tables.projects.put(project("a", "Sine", 1));
        tables.projects.put(project("b", "Delay", 2));

        let mut tx = Transaction::new(&mut tables);
        tx.put_project(project("a", "Sine Wave", 3));
        tx.delete_project(&Id::from("b"));
        tx.put_project(project("c", "Reverb", 4));
        assert!(tx.is_dirty());
        tx.rollback();

        assert_eq!(tables.projects.len(), 2);
        assert_eq!(tables.projects.get(&Id::from("a")).unwrap().name, "Sine");
        assert!(tables.projects.get(&Id::from("b")).is_some());
        assert!(tables.projects.get(&Id::from("c")).is_none());
        let order: Vec<&str> = tables
            .projects
            .newest_first()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_deleting_missing_row_records_nothing() {
        let mut tables = Tables::default();
        let mut tx = Transaction::new(&mut tables);
        assert!(tx.delete_project(&Id::from("ghost")).is_none());
        assert!(tx.delete_version(&Id::from("ghost")).is_none());
        assert!(!tx.is_dirty());
    }
}
