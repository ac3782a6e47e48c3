//! Single-writer runtime around a [`SceneManager`].
//!
//! All access goes through one async mutex, so inbound frames and API calls
//! are applied one at a time, in the order they acquire the lock.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;

use scenehub_domain::error::SceneHubError;
use scenehub_domain::time::seconds_since;

use crate::ports::{DeviceDirectory, EventSource, PersistenceHook, SendChannel};
use crate::scene_manager::SceneManager;

pub struct SceneRuntime<D, C> {
    manager: Arc<Mutex<SceneManager<D, C>>>,
}

impl<D, C> Clone for SceneRuntime<D, C> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
        }
    }
}

impl<D, C> SceneRuntime<D, C>
where
    D: DeviceDirectory + Send + 'static,
    C: SendChannel + Send + 'static,
{
    pub fn new(manager: SceneManager<D, C>) -> Self {
        Self {
            manager: Arc::new(Mutex::new(manager)),
        }
    }

    /// Exclusive access to the manager.
    pub async fn lock(&self) -> MutexGuard<'_, SceneManager<D, C>> {
        self.manager.lock().await
    }

    /// Feed every frame from `source` to the manager until the source closes.
    ///
    /// The subscription is taken before returning, so frames published right
    /// after this call are not missed.
    pub fn spawn_event_loop(&self, source: &impl EventSource) -> JoinHandle<()> {
        let mut receiver = source.subscribe();
        let manager = Arc::clone(&self.manager);
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(frame) => manager.lock().await.handle_frame(&frame),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event loop lagged, refreshing indicators");
                        if let Err(err) = manager.lock().await.refresh_indicators() {
                            tracing::warn!(%err, "unable to refresh indicators");
                        }
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("event source closed, stopping event loop");
                        break;
                    }
                }
            }
        })
    }

    /// Persist the current scene configuration.
    ///
    /// # Errors
    ///
    /// Returns whatever the hook fails with.
    pub async fn save(&self, hook: &impl PersistenceHook) -> Result<(), SceneHubError> {
        let snapshot = self.manager.lock().await.snapshot();
        hook.save(&snapshot).await?;
        tracing::info!(scenes = snapshot.scenes.len(), "scenes saved");
        Ok(())
    }

    /// Restore the stored configuration, if any. Returns the number of
    /// scenes restored.
    ///
    /// # Errors
    ///
    /// Returns whatever the hook fails with.
    pub async fn load(&self, hook: &impl PersistenceHook) -> Result<usize, SceneHubError> {
        let Some(snapshot) = hook.load().await? else {
            tracing::info!("no stored scenes");
            return Ok(0);
        };
        if let Some(saved_at) = snapshot.saved_at {
            tracing::info!(age_secs = seconds_since(saved_at), "restoring stored scenes");
        }
        Ok(self.manager.lock().await.restore(&snapshot))
    }
}
