use crate::error::Result;
use std::path::PathBuf;

/// Abstract interface for raw storage I/O.
///
/// A backend stores exactly one document: the serialized store (schema
/// declaration plus both tables). This trait handles the "how" of storage
/// (filesystem vs memory), while the engine handles the "what" (tables,
/// indexes, transactions).
pub trait StorageBackend: Send + 'static {
    /// Read the store document.
    /// Returns Ok(None) if no store has been created yet.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read_store(&self) -> Result<Option<String>>;

    /// Replace the store document.
    /// MUST be atomic (e.g. write to tmp then rename): a reader sees either the
    /// previous document or the new one, never a mix.
    fn write_store(&self, contents: &str) -> Result<()>;

    /// Where the document lives.
    /// For FsBackend, this is the real path. For MemBackend, a virtual path.
    fn location(&self) -> PathBuf;
}
