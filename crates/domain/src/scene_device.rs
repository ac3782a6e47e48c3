//! Scene device — one device's target level inside one scene.

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::id::DeviceId;

/// Target value for one device in a scene.
///
/// `scene_capable` is captured when the device is bound and never changes:
/// scene-capable devices are programmed directly with scene actuator
/// configuration, the others through controller association groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDevice {
    device_id: DeviceId,
    value: u8,
    scene_capable: bool,
}

impl SceneDevice {
    /// Bind `device` with the level it should reach when the scene runs.
    #[must_use]
    pub fn bind(device: &Device, value: u8) -> Self {
        Self {
            device_id: device.id,
            value,
            scene_capable: device.is_scene_capable(),
        }
    }

    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Change the target level.
    pub fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    #[must_use]
    pub fn is_scene_capable(&self) -> bool {
        self.scene_capable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_class::CommandClass;

    #[test]
    fn should_capture_scene_capability_at_bind_time() {
        let mut device = Device::builder()
            .id(4)
            .command_classes([CommandClass::SceneActivation, CommandClass::SceneActuatorConf])
            .build()
            .unwrap();
        let scene_device = SceneDevice::bind(&device, 50);

        device.command_classes.clear();
        assert!(scene_device.is_scene_capable());
    }

    #[test]
    fn should_update_value() {
        let device = Device::builder().id(4).build().unwrap();
        let mut scene_device = SceneDevice::bind(&device, 10);
        scene_device.set_value(99);
        assert_eq!(scene_device.value(), 99);
        assert!(!scene_device.is_scene_capable());
    }
}
