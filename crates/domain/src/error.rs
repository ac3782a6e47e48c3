//! Common error types used across the workspace.
//!
//! Each failure class is a dedicated typed error; [`SceneHubError`] wraps
//! them via `#[from]` so callers can `?` through layers and still match on
//! the class.

use crate::command_class::CommandClass;
use crate::id::{ButtonId, DeviceId, SceneId};

/// Top-level error for every fallible scene operation.
#[derive(Debug, thiserror::Error)]
pub enum SceneHubError {
    /// An argument is out of range (scene id, button id, value).
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A scene, controller or device does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Every scene id is in use.
    #[error("capacity exceeded")]
    Capacity(#[from] CapacityError),

    /// A value does not fit the wire representation, or a payload is malformed.
    #[error("encoding error")]
    Encoding(#[from] EncodingError),

    /// The target device lacks a required command class.
    #[error("unsupported by device")]
    Unsupported(#[from] UnsupportedError),

    /// The outbound channel could not accept a frame.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The persistence backend failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Argument validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Scene id 0 is reserved.
    #[error("scene id 0 is reserved")]
    ZeroSceneId,

    /// Requested scene id is above the 255 limit.
    #[error("scene id {0} is out of range 1..=255")]
    SceneIdOutOfRange(u32),

    /// Device id 0 is not a valid node.
    #[error("device id 0 is reserved")]
    ZeroDeviceId,

    /// Requested scene id already names a scene.
    #[error("scene id {0} is already in use")]
    SceneIdInUse(SceneId),

    /// Button id is not addressable on the controller.
    #[error("button {button} is not valid for controller {controller}")]
    InvalidButton {
        controller: DeviceId,
        button: ButtonId,
    },

    /// The (controller, button) pair already triggers another scene.
    #[error("button {button} of controller {controller} is already bound to scene {scene}")]
    ButtonAlreadyBound {
        controller: DeviceId,
        button: ButtonId,
        scene: SceneId,
    },

    /// The device is not a (portable) scene controller.
    #[error("device {0} is not a scene controller")]
    NotASceneController(DeviceId),

    /// Controller has not been bound to a scene-controller device.
    #[error("controller {0} is not bound")]
    ControllerNotBound(DeviceId),

    /// Number of buttons outside what one indicator byte can represent.
    #[error("number of buttons {0} is out of range 2..=8")]
    ButtonCountOutOfRange(u8),

    /// Dimming duration component outside its encodable range.
    #[error("dimming duration of {value} {unit} is out of range")]
    DurationOutOfRange { value: u16, unit: &'static str },
}

/// A lookup by id failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of thing looked up (`"Scene"`, `"Device"`, …).
    pub entity: &'static str,
    /// Rendered identifier.
    pub id: String,
}

impl NotFoundError {
    /// Missing scene.
    #[must_use]
    pub fn scene(id: SceneId) -> Self {
        Self {
            entity: "Scene",
            id: id.to_string(),
        }
    }

    /// Missing device (in the directory or in a scene).
    #[must_use]
    pub fn device(id: DeviceId) -> Self {
        Self {
            entity: "Device",
            id: id.to_string(),
        }
    }

    /// Missing scene controller.
    #[must_use]
    pub fn controller(id: DeviceId) -> Self {
        Self {
            entity: "SceneController",
            id: id.to_string(),
        }
    }
}

/// All scene ids are allocated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("all {max} scene ids are in use")]
pub struct CapacityError {
    pub max: usize,
}

/// Wire encoding and decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// A numeric field does not fit in one byte.
    #[error("{field} value {value} does not fit in one byte")]
    FieldOverflow { field: &'static str, value: u32 },

    /// Payload shorter than the message layout requires.
    #[error("{message} payload must be at least {expected} bytes, got {actual}")]
    Truncated {
        message: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Command byte does not match the message being decoded.
    #[error("unexpected command 0x{command:02X} for {message}")]
    UnexpectedCommand { message: &'static str, command: u8 },
}

/// The device does not implement a command class the operation needs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("device {device} does not support {command_class}")]
pub struct UnsupportedError {
    pub device: DeviceId,
    pub command_class: CommandClass,
}
