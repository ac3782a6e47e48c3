//! In-memory fakes for the ports, shared by the unit tests of this crate.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use scenehub_domain::command_class::CommandClass;
use scenehub_domain::device::{Device, DeviceClass};
use scenehub_domain::error::SceneHubError;
use scenehub_domain::frame::OutboundFrame;
use scenehub_domain::id::DeviceId;

use crate::ports::{DeviceDirectory, SendChannel};

/// Keeps every frame sent, in order.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    frames: Mutex<Vec<OutboundFrame>>,
    unreachable: Mutex<BTreeSet<DeviceId>>,
}

impl RecordingChannel {
    /// Make every later send to `device` fail with a transport error.
    pub fn unreachable(&self, device: DeviceId) {
        self.unreachable.lock().unwrap().insert(device);
    }

    pub fn frames(&self) -> Vec<OutboundFrame> {
        self.frames.lock().unwrap().clone()
    }

    pub fn take(&self) -> Vec<OutboundFrame> {
        std::mem::take(&mut *self.frames.lock().unwrap())
    }

    /// `(destination, class, payload)` triples, easier to assert on.
    pub fn take_raw(&self) -> Vec<(u8, CommandClass, Vec<u8>)> {
        self.take()
            .into_iter()
            .map(|f| (f.destination.as_u8(), f.command_class, f.payload))
            .collect()
    }
}

impl SendChannel for RecordingChannel {
    fn send(&self, frame: OutboundFrame) -> Result<(), SceneHubError> {
        if self.unreachable.lock().unwrap().contains(&frame.destination) {
            return Err(SceneHubError::Transport(
                format!("node {} unreachable", frame.destination).into(),
            ));
        }
        self.frames.lock().unwrap().push(frame);
        Ok(())
    }
}

/// Fixed set of devices.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    devices: BTreeMap<DeviceId, Device>,
}

impl StaticDirectory {
    pub fn with(mut self, device: Device) -> Self {
        self.devices.insert(device.id, device);
        self
    }
}

impl DeviceDirectory for StaticDirectory {
    fn get_device(&self, id: DeviceId) -> Option<Device> {
        self.devices.get(&id).cloned()
    }
}

/// Wall controller with indicator, association and configuration support.
pub fn controller(id: u8) -> Device {
    Device::builder()
        .id(id)
        .class(DeviceClass::SceneController)
        .command_classes([
            CommandClass::Basic,
            CommandClass::SceneControllerConf,
            CommandClass::Indicator,
            CommandClass::Association,
            CommandClass::Configuration,
        ])
        .build()
        .unwrap()
}

/// Dimmer without local scene memory.
pub fn dimmer(id: u8) -> Device {
    Device::builder()
        .id(id)
        .command_class(CommandClass::Basic)
        .build()
        .unwrap()
}

/// Dimmer that stores scenes itself.
pub fn scene_dimmer(id: u8) -> Device {
    Device::builder()
        .id(id)
        .command_classes([
            CommandClass::Basic,
            CommandClass::SceneActivation,
            CommandClass::SceneActuatorConf,
        ])
        .build()
        .unwrap()
}
