//! # scenehub-adapter-virtual
//!
//! Simulated mesh network for demos and end-to-end tests.
//!
//! [`VirtualNetwork`] is both the [`DeviceDirectory`] and the
//! [`SendChannel`]: every frame sent is recorded, handed to the addressed
//! simulated device, and whatever the device answers is published as an
//! inbound frame.
//!
//! ## Demo installation
//!
//! | Node | Device | Scene capable |
//! |------|--------|---------------|
//! | 2 | Wall scene controller | — |
//! | 3 | Wall scene controller | — |
//! | 4 | Portable scene controller | — |
//! | 10 | Dimmer | no |
//! | 11 | Dimmer | no |
//! | 12 | Dimmer | yes |
//!
//! ## Dependency rule
//!
//! Depends on `scenehub-app` (port traits) and `scenehub-domain` only.

mod devices;

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use scenehub_app::ports::{DeviceDirectory, FramePublisher, SendChannel};
use scenehub_domain::device::Device;
use scenehub_domain::error::{NotFoundError, SceneHubError};
use scenehub_domain::frame::{InboundFrame, OutboundFrame};
use scenehub_domain::id::DeviceId;

pub use devices::{VirtualController, VirtualDevice, VirtualDimmer};

/// Simulated network of scene controllers and dimmers.
pub struct VirtualNetwork<P> {
    publisher: P,
    devices: Mutex<BTreeMap<DeviceId, VirtualDevice>>,
    sent: Mutex<Vec<OutboundFrame>>,
}

impl<P: FramePublisher> VirtualNetwork<P> {
    /// An empty network publishing replies through `publisher`.
    pub fn new(publisher: P) -> Self {
        Self {
            publisher,
            devices: Mutex::new(BTreeMap::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// The demo installation described in the crate docs.
    pub fn demo(publisher: P) -> Self {
        let network = Self::new(publisher);
        for id in [2, 3] {
            network.add_device(VirtualDevice::Controller(VirtualController::new(DeviceId::from(id))));
        }
        network.add_device(VirtualDevice::Controller(VirtualController::portable(DeviceId::from(4))));
        for id in [10, 11] {
            network.add_device(VirtualDevice::Dimmer(VirtualDimmer::new(DeviceId::from(id))));
        }
        network.add_device(VirtualDevice::Dimmer(VirtualDimmer::scene_capable(DeviceId::from(12))));
        network
    }

    /// Include a device, replacing any node with the same id.
    pub fn add_device(&self, device: VirtualDevice) {
        let id = device.descriptor().id;
        self.lock_devices().insert(id, device);
    }

    /// Node ids, ascending.
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.lock_devices().keys().copied().collect()
    }

    /// Press a controller button, publishing what the controller sends.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if `controller` is not a simulated
    /// scene controller.
    pub fn press(&self, controller: DeviceId, button: u8) -> Result<(), SceneHubError> {
        let frames = match self.lock_devices().get_mut(&controller) {
            Some(VirtualDevice::Controller(ctrl)) => ctrl.press(button),
            _ => return Err(NotFoundError::controller(controller).into()),
        };
        tracing::debug!(%controller, button, "virtual button pressed");
        self.publish_all(frames);
        Ok(())
    }

    /// Inspect a simulated controller.
    pub fn with_controller<R>(&self, id: DeviceId, f: impl FnOnce(&VirtualController) -> R) -> Option<R> {
        match self.lock_devices().get(&id) {
            Some(VirtualDevice::Controller(ctrl)) => Some(f(ctrl)),
            _ => None,
        }
    }

    /// Inspect a simulated dimmer.
    pub fn with_dimmer<R>(&self, id: DeviceId, f: impl FnOnce(&VirtualDimmer) -> R) -> Option<R> {
        match self.lock_devices().get(&id) {
            Some(VirtualDevice::Dimmer(dimmer)) => Some(f(dimmer)),
            _ => None,
        }
    }

    /// Every frame sent so far.
    pub fn sent_frames(&self) -> Vec<OutboundFrame> {
        self.lock_sent().clone()
    }

    /// Drain the record of sent frames.
    pub fn take_sent(&self) -> Vec<OutboundFrame> {
        std::mem::take(&mut *self.lock_sent())
    }

    /// Deliver frames from an outbound queue until its senders are gone.
    pub async fn transmit(&self, mut receiver: mpsc::UnboundedReceiver<OutboundFrame>) {
        while let Some(frame) = receiver.recv().await {
            if let Err(err) = self.send(frame) {
                tracing::warn!(%err, "virtual transmission failed");
            }
        }
        tracing::debug!("outbound queue closed");
    }

    fn publish_all(&self, frames: Vec<InboundFrame>) {
        for frame in frames {
            self.publisher.publish(frame);
        }
    }

    fn lock_devices(&self) -> MutexGuard<'_, BTreeMap<DeviceId, VirtualDevice>> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_sent(&self) -> MutexGuard<'_, Vec<OutboundFrame>> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: FramePublisher> DeviceDirectory for VirtualNetwork<P> {
    fn get_device(&self, id: DeviceId) -> Option<Device> {
        self.lock_devices().get(&id).map(VirtualDevice::descriptor)
    }
}

impl<P: FramePublisher> SendChannel for VirtualNetwork<P> {
    fn send(&self, frame: OutboundFrame) -> Result<(), SceneHubError> {
        tracing::trace!(%frame, "virtual send");
        let replies = match self.lock_devices().get_mut(&frame.destination) {
            Some(device) => device.receive(&frame),
            None => {
                tracing::debug!(%frame, "no virtual node at destination");
                Vec::new()
            }
        };
        self.lock_sent().push(frame);
        self.publish_all(replies);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenehub_app::event_bus::InProcessEventBus;
    use scenehub_app::ports::EventSource;
    use scenehub_domain::command_class::CommandClass;

    fn network() -> (VirtualNetwork<InProcessEventBus>, InProcessEventBus) {
        let bus = InProcessEventBus::new(64);
        (VirtualNetwork::demo(bus.clone()), bus)
    }

    #[test]
    fn should_describe_demo_devices() {
        let (network, _) = network();
        assert_eq!(
            network.device_ids(),
            [2, 3, 4, 10, 11, 12].map(DeviceId::from).to_vec()
        );
        assert!(network.get_device(DeviceId::from(12)).unwrap().is_scene_capable());
        assert!(
            network
                .get_device(DeviceId::from(4))
                .unwrap()
                .class
                .is_scene_controller()
        );
        assert!(network.get_device(DeviceId::from(99)).is_none());
    }

    #[tokio::test]
    async fn should_publish_indicator_report_when_get_sent() {
        let (network, bus) = network();
        let mut rx = bus.subscribe();

        network
            .send(OutboundFrame::new(DeviceId::from(2), CommandClass::Indicator, vec![0x02]))
            .unwrap();

        let reply = rx.recv().await.unwrap();
        assert_eq!(reply.source, DeviceId::from(2));
        assert_eq!(reply.payload, vec![0x03, 0x00]);
        assert_eq!(network.sent_frames().len(), 1);
    }

    #[tokio::test]
    async fn should_publish_press_frames() {
        let (network, bus) = network();
        let mut rx = bus.subscribe();

        network.press(DeviceId::from(3), 2).unwrap();

        let basic = rx.recv().await.unwrap();
        assert_eq!(basic.command_class, CommandClass::Basic.id());
        assert_eq!(network.with_controller(DeviceId::from(3), VirtualController::indicator), Some(0b10));
    }

    #[test]
    fn should_reject_press_on_dimmer() {
        let (network, _) = network();
        assert!(matches!(
            network.press(DeviceId::from(10), 1),
            Err(SceneHubError::NotFound(_))
        ));
    }

    #[test]
    fn should_record_frames_to_unknown_nodes() {
        let (network, _) = network();
        network
            .send(OutboundFrame::new(DeviceId::from(77), CommandClass::Basic, vec![0x01, 0]))
            .unwrap();
        assert_eq!(network.take_sent().len(), 1);
        assert!(network.sent_frames().is_empty());
    }

    #[tokio::test]
    async fn should_deliver_queued_frames_when_transmitting() {
        let (network, _) = network();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(OutboundFrame::new(DeviceId::from(2), CommandClass::Indicator, vec![0x01, 0x04]))
            .unwrap();
        drop(tx);

        network.transmit(rx).await;

        assert_eq!(network.with_controller(DeviceId::from(2), VirtualController::indicator), Some(0x04));
    }
}
