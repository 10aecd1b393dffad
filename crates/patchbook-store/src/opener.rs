//! Lazy, shared store opening.
//!
//! Clients that cannot open the store at startup hold a [`StoreOpener`] and
//! call [`StoreOpener::open`] wherever a handle is needed. The first call
//! bootstraps the store; concurrent first calls wait on the same attempt and
//! receive the same handle. A failed attempt caches nothing, so the next call
//! tries again from scratch.

use crate::api::ProjectStore;
use crate::clock::{Clock, SystemClock};
use crate::config::{StoreConfig, StoreOptions};
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::fs_backend::FsBackend;
use std::sync::Arc;
use tokio::sync::OnceCell;

type BackendFactory = dyn Fn() -> Box<dyn StorageBackend> + Send + Sync;

pub struct StoreOpener {
    factory: Arc<BackendFactory>,
    options: StoreOptions,
    clock: Arc<dyn Clock>,
    cell: OnceCell<ProjectStore>,
}

impl StoreOpener {
    /// `factory` builds a fresh backend for every open attempt.
    pub fn new<F, B>(factory: F, options: StoreOptions) -> Self
    where
        F: Fn() -> B + Send + Sync + 'static,
        B: StorageBackend,
    {
        Self {
            factory: Arc::new(move || Box::new(factory()) as Box<dyn StorageBackend>),
            options,
            clock: Arc::new(SystemClock),
            cell: OnceCell::new(),
        }
    }

    /// An opener for the filesystem store described by `config`.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let root = config.resolved_data_dir()?;
        let file_name = config.file_name.clone();
        Ok(Self::new(
            move || FsBackend::new(root.clone()).with_file_name(&file_name),
            config.options(),
        ))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The shared handle, opening the store on first use.
    pub async fn open(&self) -> Result<ProjectStore> {
        let store = self
            .cell
            .get_or_try_init(|| {
                let backend = (self.factory)();
                tracing::debug!(location = %backend.location().display(), "Opening store");
                ProjectStore::open_boxed(backend, self.options, Arc::clone(&self.clock))
            })
            .await?;
        Ok(store.clone())
    }

    /// The handle if the store has already been opened.
    pub fn get(&self) -> Option<ProjectStore> {
        self.cell.get().cloned()
    }
}
