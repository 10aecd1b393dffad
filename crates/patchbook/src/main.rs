//! # Patchbook CLI
//!
//! The binary is a thin client over `patchbook-store`: this file only invokes
//! `cli::run()` and turns an error into an exit code.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (src/cli/)                                       │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - config + logging setup, dispatch (commands.rs)           │
//! │  - terminal rendering (render.rs)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  patchbook-store: ProjectStore handle                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything below the CLI layer is UI agnostic. Argument parsing, reading
//! stdin, printing and exit codes all happen here.

mod cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
