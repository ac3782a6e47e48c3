//! Command classes the scene subsystem speaks or inspects.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A mesh-protocol command class, identified on the wire by one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandClass {
    Basic,
    ControllerReplication,
    SceneActivation,
    SceneActuatorConf,
    SceneControllerConf,
    Configuration,
    Association,
    Indicator,
}

impl CommandClass {
    /// Every command class known to this crate.
    pub const ALL: [Self; 8] = [
        Self::Basic,
        Self::ControllerReplication,
        Self::SceneActivation,
        Self::SceneActuatorConf,
        Self::SceneControllerConf,
        Self::Configuration,
        Self::Association,
        Self::Indicator,
    ];

    /// Wire identifier.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Basic => 0x20,
            Self::ControllerReplication => 0x21,
            Self::SceneActivation => 0x2B,
            Self::SceneActuatorConf => 0x2C,
            Self::SceneControllerConf => 0x2D,
            Self::Configuration => 0x70,
            Self::Association => 0x85,
            Self::Indicator => 0x87,
        }
    }

    /// Look up a command class by wire identifier.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|cc| cc.id() == id)
    }

    /// Upper-case protocol label, as used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::ControllerReplication => "CONTROLLER_REPLICATION",
            Self::SceneActivation => "SCENE_ACTIVATION",
            Self::SceneActuatorConf => "SCENE_ACTUATOR_CONF",
            Self::SceneControllerConf => "SCENE_CONTROLLER_CONF",
            Self::Configuration => "CONFIGURATION",
            Self::Association => "ASSOCIATION",
            Self::Indicator => "INDICATOR",
        }
    }
}

impl fmt::Display for CommandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_resolve_every_known_id() {
        for cc in CommandClass::ALL {
            assert_eq!(CommandClass::from_id(cc.id()), Some(cc));
        }
    }

    #[test]
    fn should_return_none_for_unknown_id() {
        assert_eq!(CommandClass::from_id(0x25), None);
    }

    #[test]
    fn should_use_protocol_ids() {
        assert_eq!(CommandClass::SceneActuatorConf.id(), 0x2C);
        assert_eq!(CommandClass::SceneControllerConf.id(), 0x2D);
        assert_eq!(CommandClass::Indicator.id(), 0x87);
    }
}
