//! Device — a mesh node as seen by the scene subsystem.
//!
//! Discovery and inclusion live elsewhere; this is only the descriptor the
//! device directory hands out: what kind of device it is and which command
//! classes it implements.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::command_class::CommandClass;
use crate::error::ValidationError;
use crate::id::DeviceId;

/// Manufacturer id of Cooper Wiring Devices, whose controllers get flagged.
pub const COOPER_MANUFACTURER_ID: u16 = 0x001A;

/// Specific device class, reduced to what scene handling distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Wall-mounted scene controller.
    SceneController,
    /// Battery-powered, hand-held scene controller.
    PortableSceneController,
    /// Anything else (switches, dimmers, sensors, …).
    #[default]
    Other,
}

impl DeviceClass {
    /// Whether this is one of the scene-controller variants.
    #[must_use]
    pub fn is_scene_controller(self) -> bool {
        matches!(self, Self::SceneController | Self::PortableSceneController)
    }
}

/// Descriptor of one device on the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub class: DeviceClass,
    pub manufacturer: Option<u16>,
    pub command_classes: BTreeSet<CommandClass>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Whether the device implements `command_class`.
    #[must_use]
    pub fn supports(&self, command_class: CommandClass) -> bool {
        self.command_classes.contains(&command_class)
    }

    /// Whether the device can store scenes locally and be configured
    /// directly with scene actuator configuration.
    #[must_use]
    pub fn is_scene_capable(&self) -> bool {
        self.supports(CommandClass::SceneActivation)
            && self.supports(CommandClass::SceneActuatorConf)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroDeviceId`] when `id` is 0.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.as_u8() == 0 {
            return Err(ValidationError::ZeroDeviceId);
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    class: DeviceClass,
    manufacturer: Option<u16>,
    command_classes: BTreeSet<CommandClass>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn class(mut self, class: DeviceClass) -> Self {
        self.class = class;
        self
    }

    #[must_use]
    pub fn manufacturer(mut self, manufacturer: u16) -> Self {
        self.manufacturer = Some(manufacturer);
        self
    }

    #[must_use]
    pub fn command_class(mut self, command_class: CommandClass) -> Self {
        self.command_classes.insert(command_class);
        self
    }

    #[must_use]
    pub fn command_classes(mut self, command_classes: impl IntoIterator<Item = CommandClass>) -> Self {
        self.command_classes.extend(command_classes);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroDeviceId`] if the id is missing or 0.
    pub fn build(self) -> Result<Device, ValidationError> {
        let device = Device {
            id: self.id.unwrap_or(DeviceId::from(0)),
            class: self.class,
            manufacturer: self.manufacturer,
            command_classes: self.command_classes,
        };
        device.validate()?;
        Ok(device)
    }
}
