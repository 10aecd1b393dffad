use crate::model::Id;
use thiserror::Error;

/// Broad classification of a [`StoreError`], used by clients to decide how to
/// surface a failure (retry the open, retry the write, report a bad file).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Open,
    Storage,
    Format,
    Invalid,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open store at {location}: {reason}")]
    Open { location: String, reason: String },

    #[error("Store error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed export: {0}")]
    Format(String),

    #[error("Invalid project: {0}")]
    Invalid(String),

    #[error("Unknown project: {0}")]
    UnknownProject(Id),

    #[error("Cleanup interrupted after deleting {deleted} versions: {source}")]
    CleanupInterrupted {
        deleted: usize,
        #[source]
        source: Box<StoreError>,
    },

    #[error("Config error: {0}")]
    Config(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Open { .. } | StoreError::Config(_) => ErrorKind::Open,
            StoreError::Storage(_)
            | StoreError::Io(_)
            | StoreError::Serialization(_)
            | StoreError::CleanupInterrupted { .. } => ErrorKind::Storage,
            StoreError::Format(_) => ErrorKind::Format,
            StoreError::Invalid(_) | StoreError::UnknownProject(_) => ErrorKind::Invalid,
        }
    }

    pub(crate) fn open(location: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        StoreError::Open {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_groups_io_and_serialization_as_storage() {
        let io = StoreError::Io(std::io::Error::other("disk full"));
        assert_eq!(io.kind(), ErrorKind::Storage);

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(StoreError::Serialization(json).kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_cleanup_interrupted_keeps_progress_and_source() {
        let err = StoreError::CleanupInterrupted {
            deleted: 3,
            source: Box::new(StoreError::Storage("quota exceeded".into())),
        };
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(
            err.to_string(),
            "Cleanup interrupted after deleting 3 versions: Store error: quota exceeded"
        );
    }
}
