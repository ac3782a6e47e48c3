//! Typed identifier newtypes backed by single wire bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of scene ids available on a network (ids `1..=255`).
pub const MAX_SCENES: usize = 255;

macro_rules! define_byte_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u8);

        impl $name {
            /// Access the raw wire byte.
            #[must_use]
            pub const fn as_u8(self) -> u8 {
                self.0
            }
        }

        impl From<u8> for $name {
            fn from(value: u8) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    };
}

define_byte_id!(
    /// Node identifier of a device on the mesh network.
    DeviceId
);

define_byte_id!(
    /// A scene-controller button. Buttons double as association group ids.
    ButtonId
);

impl ButtonId {
    /// Zero-based position of this button in the indicator bitmask.
    ///
    /// Returns `None` for button 0, which has no indicator bit.
    #[must_use]
    pub fn indicator_bit(self) -> Option<u8> {
        self.0.checked_sub(1).filter(|bit| *bit < 8)
    }
}

/// Identifier of a scene, always in `1..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SceneId(u8);

impl SceneId {
    /// Validate and wrap a scene id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroSceneId`] for `0`.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::ZeroSceneId);
        }
        Ok(Self(value))
    }

    /// Validate a scene id coming from a wider integer (user input, files).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroSceneId`] for `0` and
    /// [`ValidationError::SceneIdOutOfRange`] above 255.
    pub fn from_u32(value: u32) -> Result<Self, ValidationError> {
        let byte = u8::try_from(value).map_err(|_| ValidationError::SceneIdOutOfRange(value))?;
        Self::new(byte)
    }

    /// Access the raw wire byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SceneId {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SceneId> for u8 {
    fn from(value: SceneId) -> Self {
        value.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reject_zero_scene_id() {
        assert_eq!(SceneId::new(0), Err(ValidationError::ZeroSceneId));
    }

    #[test]
    fn should_reject_scene_id_above_255() {
        assert_eq!(
            SceneId::from_u32(256),
            Err(ValidationError::SceneIdOutOfRange(256))
        );
    }

    #[test]
    fn should_accept_boundary_scene_ids() {
        assert_eq!(SceneId::new(1).unwrap().as_u8(), 1);
        assert_eq!(SceneId::from_u32(255).unwrap().as_u8(), 255);
    }

    #[test]
    fn should_roundtrip_device_id_through_display_and_from_str() {
        let id = DeviceId::from(42);
        let parsed: DeviceId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_reject_zero_scene_id_when_deserializing() {
        let result: Result<SceneId, _> = serde_json::from_str("0");
        assert!(result.is_err());
    }

    #[test]
    fn should_serialize_ids_as_plain_numbers() {
        let json = serde_json::to_string(&(SceneId::new(3).unwrap(), ButtonId::from(2))).unwrap();
        assert_eq!(json, "[3,2]");
    }

    #[test]
    fn should_map_button_to_zero_based_indicator_bit() {
        assert_eq!(ButtonId::from(1).indicator_bit(), Some(0));
        assert_eq!(ButtonId::from(8).indicator_bit(), Some(7));
        assert_eq!(ButtonId::from(0).indicator_bit(), None);
        assert_eq!(ButtonId::from(9).indicator_bit(), None);
    }
}
