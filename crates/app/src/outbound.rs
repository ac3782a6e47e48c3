//! Outbound queue — a [`SendChannel`] backed by an unbounded tokio mpsc
//! channel, drained by whatever task owns the transport.

use tokio::sync::mpsc;

use scenehub_domain::error::SceneHubError;
use scenehub_domain::frame::OutboundFrame;

use crate::ports::SendChannel;

/// Sending half of the shared outbound queue.
#[derive(Debug, Clone)]
pub struct QueuedSendChannel {
    sender: mpsc::UnboundedSender<OutboundFrame>,
}

impl QueuedSendChannel {
    /// Create a queue, returning the channel and the receiver the transport
    /// task drains.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundFrame>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl SendChannel for QueuedSendChannel {
    fn send(&self, frame: OutboundFrame) -> Result<(), SceneHubError> {
        tracing::trace!(%frame, "queueing frame");
        self.sender
            .send(frame)
            .map_err(|err| SceneHubError::Transport(Box::new(err)))
    }
}
