//! Inbound events — the closed set of network reports the scene subsystem
//! reacts to, decoded from raw frames.

use crate::codec::activation::{self, SceneActivation};
use crate::codec::actuator_conf::{self, ActuatorConfReport};
use crate::codec::controller_conf::{self, ControllerConfReport};
use crate::codec::replication::{self, ReplicationReport};
use crate::codec::{basic, indicator};
use crate::command_class::CommandClass;
use crate::error::EncodingError;
use crate::frame::InboundFrame;
use crate::id::DeviceId;

/// A decoded, scene-relevant report from one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A device asked for a scene to be activated.
    SceneActivation {
        source: DeviceId,
        activation: SceneActivation,
    },
    /// A controller reported its indicator bitmask.
    IndicatorReport { source: DeviceId, bitmask: u8 },
    /// A controller sent a Basic value, typically on a button press.
    BasicReport { source: DeviceId, value: u8 },
    /// A scene-capable device reported a stored scene.
    ActuatorConfReport {
        source: DeviceId,
        report: ActuatorConfReport,
    },
    /// A controller reported the scene bound to one of its groups.
    ControllerConfReport {
        source: DeviceId,
        report: ControllerConfReport,
    },
    /// A primary controller transferred part of its tables.
    Replication {
        source: DeviceId,
        report: ReplicationReport,
    },
}

impl InboundEvent {
    /// Decode a frame.
    ///
    /// Returns `Ok(None)` for command classes the scene subsystem does not
    /// handle.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError`] when a handled command class carries a
    /// malformed payload.
    pub fn decode(frame: &InboundFrame) -> Result<Option<Self>, EncodingError> {
        let Some(command_class) = CommandClass::from_id(frame.command_class) else {
            return Ok(None);
        };
        let source = frame.source;
        let payload = frame.payload.as_slice();
        let event = match command_class {
            CommandClass::SceneActivation => Self::SceneActivation {
                source,
                activation: activation::decode_set(payload)?,
            },
            CommandClass::Indicator => Self::IndicatorReport {
                source,
                bitmask: indicator::decode_report(payload)?,
            },
            CommandClass::Basic => Self::BasicReport {
                source,
                value: basic::decode(payload)?,
            },
            CommandClass::SceneActuatorConf => Self::ActuatorConfReport {
                source,
                report: actuator_conf::decode_report(payload)?,
            },
            CommandClass::SceneControllerConf => Self::ControllerConfReport {
                source,
                report: controller_conf::decode_report(payload)?,
            },
            CommandClass::ControllerReplication => Self::Replication {
                source,
                report: replication::decode(payload)?,
            },
            CommandClass::Association | CommandClass::Configuration => return Ok(None),
        };
        Ok(Some(event))
    }

    /// Device the event came from.
    #[must_use]
    pub fn source(&self) -> DeviceId {
        match self {
            Self::SceneActivation { source, .. }
            | Self::IndicatorReport { source, .. }
            | Self::BasicReport { source, .. }
            | Self::ActuatorConfReport { source, .. }
            | Self::ControllerConfReport { source, .. }
            | Self::Replication { source, .. } => *source,
        }
    }
}
