use super::backend::StorageBackend;
use crate::error::{Result, StoreError};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct MemState {
    document: Option<String>,
    writes: usize,
    simulate_read_error: bool,
    simulate_write_error: bool,
    fail_writes_after: Option<usize>,
}

/// In-memory storage backend for testing.
///
/// Clones share the same document, so a test can keep a clone to inspect what
/// was persisted, inject faults, or reopen a store over the same data.
#[derive(Clone, Default)]
pub struct MemBackend {
    state: Arc<Mutex<MemState>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemState> {
        // A panicking test thread must not wedge the other clones
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Enable read error simulation (makes bootstrap fail).
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.state().simulate_read_error = simulate;
    }

    /// Enable write error simulation for testing rollback.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.state().simulate_write_error = simulate;
    }

    /// Let `writes` more writes succeed, then fail every write after them.
    pub fn fail_writes_after(&self, writes: usize) {
        self.state().fail_writes_after = Some(writes);
    }

    /// The last document successfully written.
    pub fn document(&self) -> Option<String> {
        self.state().document.clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.state().writes
    }
}

impl StorageBackend for MemBackend {
    fn read_store(&self) -> Result<Option<String>> {
        let state = self.state();
        if state.simulate_read_error {
            return Err(StoreError::Storage("Simulated read error".to_string()));
        }
        Ok(state.document.clone())
    }

    fn write_store(&self, contents: &str) -> Result<()> {
        let mut state = self.state();
        if state.simulate_write_error {
            return Err(StoreError::Storage("Simulated write error".to_string()));
        }
        match state.fail_writes_after {
            Some(0) => return Err(StoreError::Storage("Simulated write error".to_string())),
            Some(remaining) => state.fail_writes_after = Some(remaining - 1),
            None => {}
        }
        state.document = Some(contents.to_string());
        state.writes += 1;
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://projects.json")
    }
}
