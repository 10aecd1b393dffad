//! # CLI Behavior
//!
//! This is **one possible UI client** for the store. It is the only place that
//! knows about terminal I/O, exit codes and output formatting.
//!
//! ## Naked Execution
//!
//! Running `patchbook` with no subcommand lists projects.
//!
//! ## Where Code Comes From
//!
//! `save` and `snapshot` take code from `--file` when given, otherwise from
//! piped stdin. A `snapshot` with neither records the project's current code.
//!
//! ## Output
//!
//! Human-readable output goes to stdout. Diagnostics are `tracing` events on
//! stderr, filtered by `RUST_LOG` (`--verbose` raises the default to `debug`).
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: config loading, store opening, per-command handlers
//! - `render`: output formatting (colors, columns, relative times)

mod commands;
mod render;
pub mod setup;

pub use commands::run;
