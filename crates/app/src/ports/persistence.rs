//! Persistence port — durable storage of the scene snapshot.

use std::future::Future;

use scenehub_domain::error::SceneHubError;
use scenehub_domain::snapshot::SceneSnapshot;

/// Saves and loads the scene configuration. The format is the adapter's
/// business.
pub trait PersistenceHook {
    /// Replace the stored snapshot.
    fn save(
        &self,
        snapshot: &SceneSnapshot,
    ) -> impl Future<Output = Result<(), SceneHubError>> + Send;

    /// Load the stored snapshot, or `None` when nothing was saved yet.
    fn load(&self) -> impl Future<Output = Result<Option<SceneSnapshot>, SceneHubError>> + Send;
}
