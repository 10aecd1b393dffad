//! # Command Layer
//!
//! This module contains the **core business logic** of the store. Each operation
//! lives in its own submodule as plain functions over the [`Engine`](crate::store::Engine).
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Decide what a save, delete or cleanup means in terms of table mutations
//! - Group those mutations into transactions with the right atomicity
//! - Return domain types (`Project`, `ProjectVersion`, reports), never strings
//!
//! ## What Commands Do NOT Do
//!
//! - **Scheduling**: no async, no locking. The [`ProjectStore`](crate::api::ProjectStore)
//!   handle owns the engine and runs commands on the blocking pool.
//! - **Presentation**: no stdout, no formatting beyond the export codec.
//!
//! ## Testing Strategy
//!
//! **This is where the lion's share of testing lives.** Command tests open an
//! engine over `MemBackend` with a `ManualClock` (see `test_utils`) so every
//! timestamp is distinct and predictable.
//!
//! ## Command Modules
//!
//! - [`projects`]: save, get, name lookup and recency listing
//! - [`versions`]: append and read version history
//! - [`retention`]: trim old versions per project
//! - [`delete`]: cascade delete of a project and its versions
//! - [`search`]: substring search and aggregate counts
//! - [`export`]: serialize a project to the portable text format
//! - [`import`]: parse the portable text format into a draft

pub mod delete;
pub mod export;
pub mod import;
pub mod projects;
pub mod retention;
pub mod search;
pub mod versions;
