//! # Configuration
//!
//! Store configuration is managed by [`confique`], which handles layered loading
//! from a TOML file, environment variables and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `PATCHBOOK_DATA_DIR`, `PATCHBOOK_FILE_NAME`.
//! 2. **Config file**: `patchbook.toml` in the OS config directory (via `directories`).
//!    A missing file is fine.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir | Directory holding the store document |
//! | `file_name` | `projects.json` | Store document name |
//! | `version_list_limit` | `20` | Versions returned by `list_versions` when no limit is given |
//! | `keep_versions` | `10` | Versions kept per project by cleanup when no count is given |
//! | `cleanup_scan_limit` | `1000` | Versions examined per project in one cleanup pass |
//! | `strict_references` | `false` | Reject versions whose project does not exist |

use crate::error::{Result, StoreError};
use confique::Config;
use directories::ProjectDirs;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "patchbook.toml";

/// Configuration for the store, stored in `patchbook.toml`.
#[derive(Config, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the store document. Defaults to the OS data directory.
    #[config(env = "PATCHBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Name of the store document inside `data_dir`.
    #[config(env = "PATCHBOOK_FILE_NAME", default = "projects.json")]
    pub file_name: String,

    /// Versions returned by `list_versions` when the caller gives no limit.
    #[config(default = 20)]
    pub version_list_limit: usize,

    /// Versions kept per project by cleanup when the caller gives no count.
    #[config(default = 10)]
    pub keep_versions: usize,

    /// Upper bound on versions examined per project in one cleanup pass.
    #[config(default = 1000)]
    pub cleanup_scan_limit: usize,

    /// Reject `save_version` for project ids that are not in the store.
    #[config(default = false)]
    pub strict_references: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            file_name: "projects.json".to_string(),
            version_list_limit: 20,
            keep_versions: 10,
            cleanup_scan_limit: 1000,
            strict_references: false,
        }
    }
}

impl StoreConfig {
    /// Load from the environment and the default config file.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::builder()
                .env()
                .load()
                .map_err(|e| StoreError::Config(e.to_string())),
        }
    }

    /// Load from the environment and the given config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::builder()
            .env()
            .file(path)
            .load()
            .map_err(|e| StoreError::Config(e.to_string()))
    }

    /// The configured data directory, falling back to the OS data directory.
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| StoreError::Config("Could not determine a data directory".to_string()))
    }

    pub fn options(&self) -> StoreOptions {
        StoreOptions {
            version_list_limit: self.version_list_limit,
            keep_versions: self.keep_versions,
            cleanup_scan_limit: self.cleanup_scan_limit,
            strict_references: self.strict_references,
        }
    }
}

/// Runtime knobs the engine consults, split from [`StoreConfig`] so that
/// embedders can build a store without going through file/env loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub version_list_limit: usize,
    pub keep_versions: usize,
    pub cleanup_scan_limit: usize,
    pub strict_references: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreConfig::default().options()
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "patchbook", "patchbook")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
