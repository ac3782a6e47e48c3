//! Virtual scene controller: wall or portable, with indicator LEDs.

use std::collections::{BTreeMap, BTreeSet};

use scenehub_domain::codec::{
    activation, association, basic, configuration, controller_conf, indicator,
};
use scenehub_domain::command_class::CommandClass;
use scenehub_domain::device::{Device, DeviceClass};
use scenehub_domain::frame::{InboundFrame, OutboundFrame};
use scenehub_domain::id::DeviceId;

/// A simulated scene controller.
///
/// The indicator, association groups, configuration parameters and
/// group-to-scene bindings are kept exactly as programmed so tests can
/// inspect what the scene subsystem sent.
pub struct VirtualController {
    id: DeviceId,
    portable: bool,
    indicator: u8,
    associations: BTreeMap<u8, BTreeSet<DeviceId>>,
    configuration: BTreeMap<u8, u8>,
    scenes: BTreeMap<u8, (u8, u8)>,
}

impl VirtualController {
    #[must_use]
    pub fn new(id: DeviceId) -> Self {
        Self {
            id,
            portable: false,
            indicator: 0,
            associations: BTreeMap::new(),
            configuration: BTreeMap::new(),
            scenes: BTreeMap::new(),
        }
    }

    /// A hand-held controller.
    #[must_use]
    pub fn portable(id: DeviceId) -> Self {
        Self {
            portable: true,
            ..Self::new(id)
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> Device {
        Device {
            id: self.id,
            class: if self.portable {
                DeviceClass::PortableSceneController
            } else {
                DeviceClass::SceneController
            },
            manufacturer: None,
            command_classes: [
                CommandClass::Basic,
                CommandClass::SceneControllerConf,
                CommandClass::Indicator,
                CommandClass::Association,
                CommandClass::Configuration,
            ]
            .into_iter()
            .collect(),
        }
    }

    #[must_use]
    pub fn indicator(&self) -> u8 {
        self.indicator
    }

    /// Members of association group `group`, ascending.
    #[must_use]
    pub fn associations(&self, group: u8) -> Vec<DeviceId> {
        self.associations
            .get(&group)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn configuration(&self, parameter: u8) -> Option<u8> {
        self.configuration.get(&parameter).copied()
    }

    /// Scene id and duration bound to `group`.
    #[must_use]
    pub fn scene(&self, group: u8) -> Option<(u8, u8)> {
        self.scenes.get(&group).copied()
    }

    /// Simulate a physical press: the LED toggles, a Basic SET goes out and,
    /// when the button lights up on a bound group, a scene activation too.
    pub fn press(&mut self, button: u8) -> Vec<InboundFrame> {
        let Some(bit) = button.checked_sub(1).filter(|b| *b < 8) else {
            return Vec::new();
        };
        self.indicator ^= 1 << bit;
        let on = self.indicator & (1 << bit) != 0;
        let mut frames = vec![InboundFrame::from_class(
            self.id,
            CommandClass::Basic,
            vec![basic::SET, if on { 0xFF } else { 0x00 }],
        )];
        if on && let Some((scene, duration)) = self.scene(button) {
            frames.push(InboundFrame::from_class(
                self.id,
                CommandClass::SceneActivation,
                vec![activation::SET, scene, duration],
            ));
        }
        frames
    }

    pub fn receive(&mut self, frame: &OutboundFrame) -> Vec<InboundFrame> {
        let payload = frame.payload.as_slice();
        match (frame.command_class, payload) {
            (CommandClass::Indicator, [indicator::SET, bitmask, ..]) => {
                self.indicator = *bitmask;
                Vec::new()
            }
            (CommandClass::Indicator, [indicator::GET, ..]) => vec![self.report_indicator()],
            (CommandClass::Association, [association::SET, group, nodes @ ..]) => {
                self.associations
                    .entry(*group)
                    .or_default()
                    .extend(nodes.iter().copied().map(DeviceId::from));
                Vec::new()
            }
            (CommandClass::Association, [association::REMOVE, group]) => {
                self.associations.remove(group);
                Vec::new()
            }
            (CommandClass::Association, [association::REMOVE, group, nodes @ ..]) => {
                if let Some(members) = self.associations.get_mut(group) {
                    for node in nodes {
                        members.remove(&DeviceId::from(*node));
                    }
                }
                Vec::new()
            }
            (CommandClass::Configuration, [configuration::SET, parameter, 1, value]) => {
                self.configuration.insert(*parameter, *value);
                Vec::new()
            }
            (CommandClass::SceneControllerConf, [controller_conf::SET, group, scene, duration]) => {
                self.scenes.insert(*group, (*scene, *duration));
                Vec::new()
            }
            (CommandClass::SceneControllerConf, [controller_conf::GET, group]) => {
                let (scene, duration) = self.scene(*group).unwrap_or((0, 0));
                vec![InboundFrame::from_class(
                    self.id,
                    CommandClass::SceneControllerConf,
                    vec![controller_conf::REPORT, *group, scene, duration],
                )]
            }
            _ => {
                tracing::debug!(%frame, "virtual controller ignored frame");
                Vec::new()
            }
        }
    }

    fn report_indicator(&self) -> InboundFrame {
        InboundFrame::from_class(
            self.id,
            CommandClass::Indicator,
            vec![indicator::REPORT, self.indicator],
        )
    }
}
