//! # Patchbook Store Architecture
//!
//! Patchbook keeps a library of code projects (live-coding patches, sketches,
//! snippets) and an append-only history of snapshots for each one, in a single
//! local document. This crate is the **UI-agnostic core**: the bundled CLI is
//! one client, an editor integration or a desktop app could be another.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs, opener.rs)                              │
//! │  - ProjectStore: async, cloneable handle                    │
//! │  - StoreOpener: lazy shared open with retry                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Projects, versions, retention, cascade delete            │
//! │  - Search, export/import                                    │
//! │  - Synchronous, operates on an Engine                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Engine: tables + indexes + transactions                  │
//! │  - StorageBackend trait: FsBackend, MemBackend              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! Nothing in this crate writes to stdout/stderr or exits the process.
//! Diagnostics go through `tracing`; the embedding application decides whether
//! and where to subscribe.
//!
//! ## Testing Strategy
//!
//! - **Storage**: engine and backend tests against [`store::mem_backend::MemBackend`],
//!   which can simulate read and write failures.
//! - **Commands**: unit tests with a ticking [`clock::ManualClock`] via
//!   `test_utils::TestEngine`.
//! - **API**: async tests through `test_utils::test_store`.
//! - **Integration** (`tests/`): the filesystem backend end to end.
//!
//! Enable the `test_utils` feature to use the helpers from other crates.

pub mod api;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod opener;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use api::ProjectStore;
pub use commands::delete::DeleteOutcome;
pub use commands::retention::{CleanupReport, ProjectCleanup};
pub use config::{StoreConfig, StoreOptions};
pub use error::{ErrorKind, Result, StoreError};
pub use model::{Id, Project, ProjectDraft, ProjectVersion, Stats, Timestamp};
pub use opener::StoreOpener;
pub use store::fs_backend::FsBackend;
pub use store::mem_backend::MemBackend;
