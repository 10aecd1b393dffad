use crate::api::ProjectStore;
use crate::clock::{Clock, ManualClock};
use crate::config::StoreOptions;
use crate::store::mem_backend::MemBackend;
use crate::store::Engine;
use std::sync::Arc;

/// Start of every test clock: 2024-01-01T00:00:00Z.
pub const TEST_EPOCH: i64 = 1_704_067_200_000;

pub struct TestEngine {
    pub backend: MemBackend,
    pub clock: Arc<ManualClock>,
    pub engine: Engine,
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEngine {
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn strict() -> Self {
        Self::with_options(StoreOptions {
            strict_references: true,
            ..StoreOptions::default()
        })
    }

    pub fn with_options(options: StoreOptions) -> Self {
        let backend = MemBackend::new();
        let clock = Arc::new(ManualClock::new(TEST_EPOCH, 1));
        let engine = Engine::open(
            Box::new(backend.clone()),
            Arc::clone(&clock) as Arc<dyn Clock>,
            options,
        )
        .expect("failed to open in-memory engine");
        Self {
            backend,
            clock,
            engine,
        }
    }
}

/// An async handle over a fresh in-memory store with a ticking test clock.
pub async fn test_store() -> (MemBackend, ProjectStore) {
    test_store_with(StoreOptions::default()).await
}

pub async fn test_store_with(options: StoreOptions) -> (MemBackend, ProjectStore) {
    let backend = MemBackend::new();
    let store = ProjectStore::open_with_clock(
        backend.clone(),
        options,
        Arc::new(ManualClock::new(TEST_EPOCH, 1)),
    )
    .await
    .expect("failed to open in-memory store");
    (backend, store)
}
