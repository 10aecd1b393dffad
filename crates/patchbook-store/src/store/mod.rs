//! # Storage Layer
//!
//! The store is a small embedded engine with two logical tables, `projects`
//! and `versions`, each keyed by `id` and carrying ordered secondary indexes
//! (see [`table`]).
//!
//! ## Layout
//!
//! - [`backend::StorageBackend`]: raw I/O for one document (filesystem or memory).
//! - [`schema`]: the document format, schema declaration and bootstrap.
//! - [`table`]: rows plus indexes, rebuilt in memory on open.
//! - [`txn::Transaction`]: read-write access with an undo log.
//! - [`Engine`]: ties the above together; owned by the `ProjectStore` handle.
//!
//! ## Commit Protocol
//!
//! 1. The transaction body mutates the live tables, logging undo entries.
//! 2. On success, the whole document is encoded and handed to the backend,
//!    which replaces it atomically (tmp file + rename on disk).
//! 3. If the body fails or the write fails, the undo log is replayed.
//!
//! Either every mutation of a transaction is visible (in memory and on disk)
//! or none is. A transaction that changed nothing skips the write.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! └── projects.json      # schema declaration + both tables
//! ```

use crate::clock::Clock;
use crate::config::StoreOptions;
use crate::error::Result;
use crate::model::Timestamp;
use std::path::PathBuf;
use std::sync::Arc;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod schema;
pub mod table;
pub mod txn;

use backend::StorageBackend;
use table::Tables;
use txn::Transaction;

pub struct Engine {
    backend: Box<dyn StorageBackend>,
    tables: Tables,
    clock: Arc<dyn Clock>,
    options: StoreOptions,
}

impl Engine {
    /// Bootstrap the store behind `backend` and load its tables.
    pub fn open(
        backend: Box<dyn StorageBackend>,
        clock: Arc<dyn Clock>,
        options: StoreOptions,
    ) -> Result<Self> {
        let tables = schema::bootstrap(backend.as_ref())?;
        Ok(Self {
            backend,
            tables,
            clock,
            options,
        })
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn location(&self) -> PathBuf {
        self.backend.location()
    }

    /// Run `body` as one atomic read-write transaction.
    pub fn write<R>(
        &mut self,
        body: impl FnOnce(&mut Transaction<'_>) -> Result<R>,
    ) -> Result<R> {
        let mut tx = Transaction::new(&mut self.tables);
        let value = match body(&mut tx) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "Transaction failed, rolling back");
                tx.rollback();
                return Err(err);
            }
        };

        if !tx.is_dirty() {
            return Ok(value);
        }

        let persisted =
            schema::encode(tx.tables()).and_then(|contents| self.backend.write_store(&contents));
        if let Err(err) = persisted {
            tracing::warn!(error = %err, "Commit failed, rolling back");
            tx.rollback();
            return Err(err);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::StoreError;
    use crate::model::{Id, Project};
    use mem_backend::MemBackend;

    fn open(backend: &MemBackend) -> Engine {
        Engine::open(
            Box::new(backend.clone()),
            Arc::new(ManualClock::new(1_000, 1)),
            StoreOptions::default(),
        )
        .unwrap()
    }

    fn project(id: &str) -> Project {
        Project {
            id: Id::from(id),
            name: "Sine".into(),
            code: "osc()".into(),
            description: None,
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn test_commit_persists_and_survives_reopen() {
        let backend = MemBackend::new();
        let mut engine = open(&backend);
        engine
            .write(|tx| {
                tx.put_project(project("p1"));
                Ok(())
            })
            .unwrap();

        let reopened = open(&backend);
        assert!(reopened.tables().projects.contains(&Id::from("p1")));
    }

    #[test]
    fn test_failed_body_rolls_back_without_writing() {
        let backend = MemBackend::new();
        let mut engine = open(&backend);
        let writes_before = backend.write_count();

        let result: Result<()> = engine.write(|tx| {
            tx.put_project(project("p1"));
            Err(StoreError::Storage("boom".into()))
        });

        assert!(result.is_err());
        assert!(engine.tables().projects.is_empty());
        assert_eq!(backend.write_count(), writes_before);
    }

    #[test]
    fn test_failed_persist_rolls_back_memory() {
        let backend = MemBackend::new();
        let mut engine = open(&backend);
        backend.set_simulate_write_error(true);

        let result = engine.write(|tx| {
            tx.put_project(project("p1"));
            Ok(())
        });

        assert!(result.is_err());
        assert!(engine.tables().projects.is_empty());
    }

    #[test]
    fn test_clean_transaction_skips_write() {
        let backend = MemBackend::new();
        let mut engine = open(&backend);
        let writes_before = backend.write_count();

        let count = engine
            .write(|tx| Ok(tx.tables().projects.len()))
            .unwrap();

        assert_eq!(count, 0);
        assert_eq!(backend.write_count(), writes_before);
    }
}
