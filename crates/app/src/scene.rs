//! Scene — a numbered set of device target levels, plus the controller
//! buttons that trigger it.
//!
//! Devices that cannot store scenes themselves are reached through the
//! controllers' association groups: the controller keeps the level in a
//! configuration parameter and fans the group command out. Scene-capable
//! devices are configured directly.

use std::collections::BTreeMap;

use scenehub_domain::codec::{actuator_conf, association, configuration, controller_conf};
use scenehub_domain::command_class::CommandClass;
use scenehub_domain::duration::DimmingDuration;
use scenehub_domain::error::{NotFoundError, SceneHubError, UnsupportedError, ValidationError};
use scenehub_domain::frame::OutboundFrame;
use scenehub_domain::id::{ButtonId, DeviceId, SceneId};
use scenehub_domain::scene_device::SceneDevice;
use scenehub_domain::snapshot::{ControllerRecord, DeviceRecord, SceneRecord};

use crate::ports::{DeviceDirectory, SendChannel};
use crate::scene_controller::{ControllerRegistry, SceneController};

/// Messages sent by each phase of [`Scene::program`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramSummary {
    pub reset: usize,
    pub grouped_devices: usize,
    pub controllers: usize,
    pub scene_capable_devices: usize,
}

impl ProgramSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.reset + self.grouped_devices + self.controllers + self.scene_capable_devices
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    id: SceneId,
    name: String,
    duration: DimmingDuration,
    override_level: bool,
    devices: Vec<SceneDevice>,
    controllers: BTreeMap<DeviceId, ButtonId>,
}

impl Scene {
    #[must_use]
    pub fn new(id: SceneId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            duration: DimmingDuration::default(),
            override_level: true,
            devices: Vec::new(),
            controllers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> SceneId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn dimming_duration(&self) -> DimmingDuration {
        self.duration
    }

    pub fn set_dimming_duration(&mut self, duration: DimmingDuration) {
        self.duration = duration;
    }

    /// Whether scene-capable devices apply the programmed level rather than
    /// keeping their current output.
    #[must_use]
    pub fn is_override(&self) -> bool {
        self.override_level
    }

    pub fn set_override(&mut self, override_level: bool) {
        self.override_level = override_level;
    }

    /// Members, in the order they were added.
    #[must_use]
    pub fn devices(&self) -> &[SceneDevice] {
        &self.devices
    }

    #[must_use]
    pub fn device(&self, id: DeviceId) -> Option<&SceneDevice> {
        self.devices.iter().find(|d| d.device_id() == id)
    }

    /// Bound controllers and the button each one uses for this scene.
    pub fn controllers(&self) -> impl Iterator<Item = (DeviceId, ButtonId)> + '_ {
        self.controllers.iter().map(|(id, button)| (*id, *button))
    }

    #[must_use]
    pub fn scene_controller_button(&self, controller: DeviceId) -> Option<ButtonId> {
        self.controllers.get(&controller).copied()
    }

    /// Whether `controller` is bound to this scene through `button`.
    #[must_use]
    pub fn is_scene_controller_bound(&self, controller: DeviceId, button: ButtonId) -> bool {
        self.scene_controller_button(controller) == Some(button)
    }

    /// Add a device, or update its level if it is already a member.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if the directory does not know the device.
    pub fn add_device(
        &mut self,
        directory: &impl DeviceDirectory,
        device_id: DeviceId,
        value: u8,
    ) -> Result<(), SceneHubError> {
        let device = directory
            .get_device(device_id)
            .ok_or_else(|| NotFoundError::device(device_id))?;
        let member = SceneDevice::bind(&device, value);
        match self.devices.iter_mut().find(|d| d.device_id() == device_id) {
            Some(existing) => *existing = member,
            None => self.devices.push(member),
        }
        Ok(())
    }

    /// Returns `true` if the device was a member.
    pub fn remove_device(&mut self, device_id: DeviceId) -> bool {
        let before = self.devices.len();
        self.devices.retain(|d| d.device_id() != device_id);
        self.devices.len() != before
    }

    /// Change a member's target level.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if the device is not in the scene.
    pub fn set_device_value(&mut self, device_id: DeviceId, value: u8) -> Result<(), NotFoundError> {
        let member = self
            .devices
            .iter_mut()
            .find(|d| d.device_id() == device_id)
            .ok_or_else(|| NotFoundError::device(device_id))?;
        member.set_value(value);
        Ok(())
    }

    /// Bind `button` of `controller` to this scene. Returns the button the
    /// controller previously used for this scene, if any.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::ControllerNotBound`] for an unbound controller
    /// - [`ValidationError::InvalidButton`] for a button the controller
    ///   does not accept
    pub fn put_scene_controller(
        &mut self,
        controller: &SceneController,
        button: ButtonId,
    ) -> Result<Option<ButtonId>, ValidationError> {
        if !controller.is_bound() {
            return Err(ValidationError::ControllerNotBound(controller.device_id()));
        }
        if !controller.is_button_id_valid(button) {
            return Err(ValidationError::InvalidButton {
                controller: controller.device_id(),
                button,
            });
        }
        Ok(self.controllers.insert(controller.device_id(), button))
    }

    /// Unbind a controller. Returns the button it was using.
    pub fn remove_scene_controller(&mut self, controller: DeviceId) -> Option<ButtonId> {
        self.controllers.remove(&controller)
    }

    /// Non-scene-capable members bucketed by target level. Scene-capable
    /// devices are configured directly and never appear here.
    #[must_use]
    pub fn group_devices_by_target_level(&self) -> BTreeMap<u8, Vec<DeviceId>> {
        let mut buckets: BTreeMap<u8, Vec<DeviceId>> = BTreeMap::new();
        for device in self.devices.iter().filter(|d| !d.is_scene_capable()) {
            buckets
                .entry(device.value())
                .or_default()
                .push(device.device_id());
        }
        buckets
    }

    pub fn devices_supporting_scene_activation(&self) -> impl Iterator<Item = &SceneDevice> {
        self.devices.iter().filter(|d| d.is_scene_capable())
    }

    /// Push this scene's configuration to every controller and device.
    ///
    /// 1. reset each controller's group
    /// 2. associate each level bucket with every controller group and store
    ///    the level in the controller's configuration parameter
    /// 3. bind each controller group to the scene id and associate it with
    ///    the scene-capable devices and the coordinator
    /// 4. store the level in every scene-capable device
    ///
    /// Each phase overwrites what a previous run left behind, so running it
    /// again is safe. Capability checks happen before anything is sent.
    ///
    /// # Errors
    ///
    /// - [`NotFoundError`] if a bound controller is missing from `registry`
    /// - [`ValidationError::ControllerNotBound`] for an unbound controller
    /// - [`UnsupportedError`] if a controller lacks association, or
    ///   configuration while level buckets exist
    /// - transport or encoding errors while sending; earlier phases stay
    ///   applied
    #[tracing::instrument(skip_all, fields(scene = %self.id, name = %self.name))]
    pub fn program(
        &self,
        registry: &ControllerRegistry,
        channel: &impl SendChannel,
        coordinator: DeviceId,
    ) -> Result<ProgramSummary, SceneHubError> {
        let buckets = self.group_devices_by_target_level();
        let controllers = self.resolve_controllers(registry)?;
        for (controller, _) in &controllers {
            if !controller.supports_association() {
                return Err(unsupported(controller, CommandClass::Association));
            }
            if !buckets.is_empty() && !controller.supports_configuration() {
                return Err(unsupported(controller, CommandClass::Configuration));
            }
        }

        let mut summary = ProgramSummary::default();
        let scene_id = u32::from(self.id.as_u8());
        let duration = u32::from(self.duration.as_u8());

        for (controller, button) in &controllers {
            controller.reset_associations(*button, channel)?;
            summary.reset += 1;
        }
        tracing::debug!(count = summary.reset, "reset controller groups");

        for (level, device_ids) in &buckets {
            for (controller, button) in &controllers {
                let group = u32::from(button.as_u8());
                send(
                    channel,
                    controller.device_id(),
                    CommandClass::Association,
                    association::encode_set(group, device_ids)?,
                )?;
                send(
                    channel,
                    controller.device_id(),
                    CommandClass::Configuration,
                    configuration::encode_set(group, u32::from(*level))?,
                )?;
                summary.grouped_devices += 2;
            }
        }
        tracing::debug!(
            buckets = buckets.len(),
            count = summary.grouped_devices,
            "programmed grouped devices"
        );

        let mut capable: Vec<DeviceId> = self
            .devices_supporting_scene_activation()
            .map(SceneDevice::device_id)
            .collect();
        capable.push(coordinator);
        for (controller, button) in &controllers {
            let group = u32::from(button.as_u8());
            send(
                channel,
                controller.device_id(),
                CommandClass::SceneControllerConf,
                controller_conf::encode_set(group, scene_id, duration)?,
            )?;
            send(
                channel,
                controller.device_id(),
                CommandClass::Association,
                association::encode_set(group, &capable)?,
            )?;
            summary.controllers += 2;
        }
        tracing::debug!(count = summary.controllers, "programmed controllers");

        for device in self.devices_supporting_scene_activation() {
            send(
                channel,
                device.device_id(),
                CommandClass::SceneActuatorConf,
                actuator_conf::encode_set(
                    scene_id,
                    u32::from(device.value()),
                    duration,
                    self.override_level,
                )?,
            )?;
            summary.scene_capable_devices += 1;
        }

        tracing::info!(messages = summary.total(), "scene programmed");
        Ok(summary)
    }

    /// Turn on the bound button of every controller. Returns how many
    /// controllers actually received a SET.
    ///
    /// # Errors
    ///
    /// Same lookup errors as [`Scene::program`], plus send failures.
    pub fn activate(
        &self,
        registry: &mut ControllerRegistry,
        channel: &impl SendChannel,
    ) -> Result<usize, SceneHubError> {
        if self.controllers.is_empty() {
            tracing::info!(scene = %self.id, "scene has no controllers, nothing to activate");
            return Ok(0);
        }
        self.resolve_controllers(registry)?;
        let mut changed = 0;
        for (controller_id, button) in self.controllers() {
            let controller = registry
                .get_mut(controller_id)
                .ok_or_else(|| NotFoundError::controller(controller_id))?;
            if controller.set_button_on(button, channel)? {
                changed += 1;
            }
        }
        tracing::info!(scene = %self.id, changed, "scene activated");
        Ok(changed)
    }

    /// Mirror a button change seen on `origin` onto every other controller
    /// bound to this scene. Returns how many controllers received a SET.
    ///
    /// # Errors
    ///
    /// Propagates the first controller failure; controllers missing from the
    /// registry are skipped.
    pub fn sync_controllers(
        &self,
        origin: DeviceId,
        on: bool,
        registry: &mut ControllerRegistry,
        channel: &impl SendChannel,
    ) -> Result<usize, SceneHubError> {
        let mut changed = 0;
        for (controller_id, button) in self.controllers().filter(|(id, _)| *id != origin) {
            let Some(controller) = registry.get_mut(controller_id) else {
                tracing::warn!(scene = %self.id, controller = %controller_id, "controller not registered, skipping sync");
                continue;
            };
            if controller.set_button(button, on, channel)? {
                changed += 1;
            }
        }
        tracing::debug!(scene = %self.id, %origin, on, changed, "synchronised controllers");
        Ok(changed)
    }

    #[must_use]
    pub fn to_record(&self) -> SceneRecord {
        SceneRecord {
            id: self.id,
            name: self.name.clone(),
            duration: self.duration,
            override_level: self.override_level,
            devices: self
                .devices
                .iter()
                .map(|d| DeviceRecord {
                    device_id: d.device_id(),
                    value: d.value(),
                })
                .collect(),
            controllers: self
                .controllers()
                .map(|(device_id, button)| ControllerRecord { device_id, button })
                .collect(),
        }
    }

    fn resolve_controllers<'r>(
        &self,
        registry: &'r ControllerRegistry,
    ) -> Result<Vec<(&'r SceneController, ButtonId)>, SceneHubError> {
        self.controllers()
            .map(|(id, button)| {
                let controller = registry
                    .get(id)
                    .ok_or_else(|| NotFoundError::controller(id))?;
                if !controller.is_bound() {
                    return Err(ValidationError::ControllerNotBound(id).into());
                }
                Ok((controller, button))
            })
            .collect()
    }
}

fn unsupported(controller: &SceneController, command_class: CommandClass) -> SceneHubError {
    UnsupportedError {
        device: controller.device_id(),
        command_class,
    }
    .into()
}

fn send(
    channel: &impl SendChannel,
    destination: DeviceId,
    command_class: CommandClass,
    payload: Vec<u8>,
) -> Result<(), SceneHubError> {
    channel.send(OutboundFrame::new(destination, command_class, payload))
}
