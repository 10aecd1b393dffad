use super::backend::StorageBackend;
use crate::error::{Result, StoreError};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

pub const DEFAULT_FILE_NAME: &str = "projects.json";

pub struct FsBackend {
    root: PathBuf,
    file_name: String,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    pub fn with_file_name(mut self, name: &str) -> Self {
        self.file_name = name.to_string();
        self
    }

    fn store_path(&self) -> PathBuf {
        self.root.join(&self.file_name)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(StoreError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read_store(&self) -> Result<Option<String>> {
        let path = self.store_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path).map_err(StoreError::Io)?;
        Ok(Some(contents))
    }

    fn write_store(&self, contents: &str) -> Result<()> {
        self.ensure_dir()?;

        // Atomic write: a crash leaves either the old document or the new one
        let tmp_path = self
            .root
            .join(format!(".{}-{}.tmp", self.file_name, Uuid::new_v4()));
        if let Err(err) = fs::write(&tmp_path, contents) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io(err));
        }
        fs::rename(&tmp_path, self.store_path()).map_err(StoreError::Io)?;
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.store_path()
    }
}
