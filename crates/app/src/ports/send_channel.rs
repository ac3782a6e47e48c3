//! Send channel port — the outbound side of the transport.

use std::sync::Arc;

use scenehub_domain::error::SceneHubError;
use scenehub_domain::frame::OutboundFrame;

/// Accepts frames for transmission.
///
/// Sending only enqueues: it never waits for the device to answer. Any
/// effect is observed later through an inbound report.
pub trait SendChannel {
    /// Enqueue one frame.
    ///
    /// # Errors
    ///
    /// Returns [`SceneHubError::Transport`] when the queue is closed.
    fn send(&self, frame: OutboundFrame) -> Result<(), SceneHubError>;
}

impl<T: SendChannel + ?Sized> SendChannel for Arc<T> {
    fn send(&self, frame: OutboundFrame) -> Result<(), SceneHubError> {
        (**self).send(frame)
    }
}

impl<T: SendChannel + ?Sized> SendChannel for &T {
    fn send(&self, frame: OutboundFrame) -> Result<(), SceneHubError> {
        (**self).send(frame)
    }
}
