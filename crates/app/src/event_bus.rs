//! In-process frame bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use scenehub_domain::frame::InboundFrame;

use crate::ports::{EventSource, FramePublisher};

/// Fan-out of inbound mesh frames to every subscriber.
///
/// Frames published while nobody listens are lost. A subscriber that falls
/// more than `capacity` frames behind sees `RecvError::Lagged`.
#[derive(Clone)]
pub struct InProcessEventBus {
    sender: broadcast::Sender<InboundFrame>,
}

impl InProcessEventBus {
    /// A bus buffering up to `capacity` frames per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }
}

impl EventSource for InProcessEventBus {
    fn subscribe(&self) -> broadcast::Receiver<InboundFrame> {
        self.sender.subscribe()
    }
}

impl FramePublisher for InProcessEventBus {
    fn publish(&self, frame: InboundFrame) {
        // Fails only when nobody is subscribed, which is fine.
        let _ = self.sender.send(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenehub_domain::id::DeviceId;

    fn indicator_report(source: u8) -> InboundFrame {
        InboundFrame::new(DeviceId::from(source), 0x87, vec![0x03, 0x01])
    }

    #[tokio::test]
    async fn should_deliver_frame_to_subscriber() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(indicator_report(2));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.source, DeviceId::from(2));
    }

    #[tokio::test]
    async fn should_deliver_frame_to_multiple_subscribers() {
        let bus = InProcessEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(indicator_report(3));

        assert_eq!(rx1.recv().await.unwrap().source, DeviceId::from(3));
        assert_eq!(rx2.recv().await.unwrap().source, DeviceId::from(3));
    }

    #[test]
    fn should_not_panic_when_no_subscribers() {
        let bus = InProcessEventBus::new(16);
        bus.publish(indicator_report(1));
    }

    #[tokio::test]
    async fn should_not_deliver_frames_published_before_subscription() {
        let bus = InProcessEventBus::new(16);
        bus.publish(indicator_report(1));

        let mut rx = bus.subscribe();
        bus.publish(indicator_report(9));

        assert_eq!(rx.recv().await.unwrap().source, DeviceId::from(9));
    }
}
