//! Event source port — publish/subscribe for inbound frames.

use std::sync::Arc;

use tokio::sync::broadcast;

use scenehub_domain::frame::InboundFrame;

/// Hands out subscriptions to frames received from the network.
pub trait EventSource {
    /// Subscribe to every frame received *after* this call.
    fn subscribe(&self) -> broadcast::Receiver<InboundFrame>;
}

/// Injects received frames (used by transports and simulators).
pub trait FramePublisher {
    /// Deliver a frame to all current subscribers.
    fn publish(&self, frame: InboundFrame);
}

impl<T: EventSource + ?Sized> EventSource for Arc<T> {
    fn subscribe(&self) -> broadcast::Receiver<InboundFrame> {
        (**self).subscribe()
    }
}

impl<T: FramePublisher + ?Sized> FramePublisher for Arc<T> {
    fn publish(&self, frame: InboundFrame) {
        (**self).publish(frame);
    }
}
