//! Storage-specific error type wrapping IO and JSON errors.

use scenehub_domain::error::SceneHubError;

/// Errors originating from the JSON file store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading, writing or renaming the file failed.
    #[error("io error")]
    Io(#[from] std::io::Error),

    /// The file does not hold a valid snapshot.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

impl From<StorageError> for SceneHubError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
