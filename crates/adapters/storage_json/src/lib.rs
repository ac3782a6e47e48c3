//! # scenehub-adapter-storage-json
//!
//! Stores the scene snapshot as a single pretty-printed JSON document.
//!
//! ## Responsibilities
//! - Implement [`PersistenceHook`] from `scenehub-app::ports`
//! - Replace the file atomically (write to a sibling temp file, then rename)
//! - Treat a missing file as "nothing saved yet"
//!
//! ## Dependency rule
//! Depends on `scenehub-app` (for the port trait) and `scenehub-domain` (for
//! the snapshot types). The `app` and `domain` crates must never reference
//! this adapter.

mod error;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use scenehub_app::ports::PersistenceHook;
use scenehub_domain::error::SceneHubError;
use scenehub_domain::snapshot::SceneSnapshot;

pub use error::StorageError;

/// Snapshot store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, snapshot: &SceneSnapshot) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, json).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    async fn read(&self) -> Result<Option<SceneSnapshot>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

impl PersistenceHook for JsonFileStore {
    async fn save(&self, snapshot: &SceneSnapshot) -> Result<(), SceneHubError> {
        self.write(snapshot).await?;
        tracing::debug!(path = %self.path.display(), scenes = snapshot.scenes.len(), "snapshot written");
        Ok(())
    }

    async fn load(&self) -> Result<Option<SceneSnapshot>, SceneHubError> {
        let snapshot = self.read().await?;
        tracing::debug!(path = %self.path.display(), found = snapshot.is_some(), "snapshot read");
        Ok(snapshot)
    }
}
