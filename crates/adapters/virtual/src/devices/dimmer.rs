//! Virtual dimmer: with or without local scene memory.

use std::collections::BTreeMap;

use scenehub_domain::codec::{actuator_conf, basic};
use scenehub_domain::command_class::CommandClass;
use scenehub_domain::device::{Device, DeviceClass};
use scenehub_domain::frame::{InboundFrame, OutboundFrame};
use scenehub_domain::id::DeviceId;

/// A simulated dimmer. Scene-capable dimmers remember the level of each
/// scene they were configured for.
pub struct VirtualDimmer {
    id: DeviceId,
    scene_capable: bool,
    level: u8,
    scenes: BTreeMap<u8, (u8, u8)>,
}

impl VirtualDimmer {
    /// A dimmer that only understands Basic.
    #[must_use]
    pub fn new(id: DeviceId) -> Self {
        Self {
            id,
            scene_capable: false,
            level: 0,
            scenes: BTreeMap::new(),
        }
    }

    /// A dimmer with scene activation and scene actuator configuration.
    #[must_use]
    pub fn scene_capable(id: DeviceId) -> Self {
        Self {
            scene_capable: true,
            ..Self::new(id)
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> Device {
        let mut command_classes = vec![CommandClass::Basic];
        if self.scene_capable {
            command_classes.extend([CommandClass::SceneActivation, CommandClass::SceneActuatorConf]);
        }
        Device {
            id: self.id,
            class: DeviceClass::Other,
            manufacturer: None,
            command_classes: command_classes.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Level stored for `scene`, if configured.
    #[must_use]
    pub fn scene_level(&self, scene: u8) -> Option<u8> {
        self.scenes.get(&scene).map(|(level, _)| *level)
    }

    pub fn receive(&mut self, frame: &OutboundFrame) -> Vec<InboundFrame> {
        match (frame.command_class, frame.payload.as_slice()) {
            (CommandClass::Basic, [basic::SET, level, ..]) => {
                self.level = *level;
                Vec::new()
            }
            (CommandClass::SceneActuatorConf, [actuator_conf::SET, scene, duration, _override, level])
                if self.scene_capable =>
            {
                self.scenes.insert(*scene, (*level, *duration));
                Vec::new()
            }
            (CommandClass::SceneActuatorConf, [actuator_conf::GET, scene]) if self.scene_capable => {
                let (level, duration) = self.scenes.get(scene).copied().unwrap_or((0, 0));
                vec![InboundFrame::from_class(
                    self.id,
                    CommandClass::SceneActuatorConf,
                    vec![actuator_conf::REPORT, *scene, level, duration],
                )]
            }
            _ => {
                tracing::debug!(%frame, "virtual dimmer ignored frame");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_store_scene_level_when_capable() {
        let mut dimmer = VirtualDimmer::scene_capable(DeviceId::from(12));
        dimmer.receive(&OutboundFrame::new(
            DeviceId::from(12),
            CommandClass::SceneActuatorConf,
            vec![0x01, 4, 3, 0x80, 40],
        ));
        assert_eq!(dimmer.scene_level(4), Some(40));
    }

    #[test]
    fn should_ignore_scene_configuration_when_not_capable() {
        let mut dimmer = VirtualDimmer::new(DeviceId::from(10));
        dimmer.receive(&OutboundFrame::new(
            DeviceId::from(10),
            CommandClass::SceneActuatorConf,
            vec![0x01, 4, 3, 0x80, 40],
        ));
        assert_eq!(dimmer.scene_level(4), None);
        assert!(!dimmer.descriptor().is_scene_capable());
    }

    #[test]
    fn should_follow_basic_set() {
        let mut dimmer = VirtualDimmer::new(DeviceId::from(10));
        dimmer.receive(&OutboundFrame::new(
            DeviceId::from(10),
            CommandClass::Basic,
            vec![0x01, 99],
        ));
        assert_eq!(dimmer.level(), 99);
    }
}
