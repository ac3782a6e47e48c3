//! Scene manager — the scene registry and the routing of inbound reports.
//!
//! The manager owns every scene, every scene controller and an index
//! `controller → button → scene`. The index is what lets an indicator
//! report be turned into the right scene without scanning the whole table,
//! and it guarantees a (controller, button) pair triggers at most one scene.

use std::collections::BTreeMap;

use scenehub_domain::duration::DimmingDuration;
use scenehub_domain::error::{CapacityError, NotFoundError, SceneHubError, ValidationError};
use scenehub_domain::event::InboundEvent;
use scenehub_domain::frame::InboundFrame;
use scenehub_domain::id::{ButtonId, DeviceId, MAX_SCENES, SceneId};
use scenehub_domain::snapshot::SceneSnapshot;
use scenehub_domain::time::{millis_since, now};

use crate::ports::{DeviceDirectory, SendChannel};
use crate::scene::{ProgramSummary, Scene};
use crate::scene_controller::{ControllerRegistry, DEFAULT_NUMBER_OF_BUTTONS, SceneController};

/// Node id the coordinator uses unless configured otherwise.
pub const DEFAULT_COORDINATOR_ID: u8 = 1;

pub struct SceneManager<D, C> {
    directory: D,
    channel: C,
    coordinator: DeviceId,
    number_of_buttons: u8,
    scenes: BTreeMap<SceneId, Scene>,
    controllers: ControllerRegistry,
    index: BTreeMap<DeviceId, BTreeMap<ButtonId, SceneId>>,
}

impl<D, C> SceneManager<D, C>
where
    D: DeviceDirectory,
    C: SendChannel,
{
    pub fn new(directory: D, channel: C) -> Self {
        Self {
            directory,
            channel,
            coordinator: DeviceId::from(DEFAULT_COORDINATOR_ID),
            number_of_buttons: DEFAULT_NUMBER_OF_BUTTONS,
            scenes: BTreeMap::new(),
            controllers: ControllerRegistry::new(),
            index: BTreeMap::new(),
        }
    }

    /// Node id added to every controller group so activations reach us.
    #[must_use]
    pub fn with_coordinator(mut self, coordinator: DeviceId) -> Self {
        self.coordinator = coordinator;
        self
    }

    /// Button count given to controllers bound from now on.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ButtonCountOutOfRange`] outside `2..=8`.
    pub fn with_number_of_buttons(mut self, number_of_buttons: u8) -> Result<Self, ValidationError> {
        if !(2..=8).contains(&number_of_buttons) {
            return Err(ValidationError::ButtonCountOutOfRange(number_of_buttons));
        }
        self.number_of_buttons = number_of_buttons;
        Ok(self)
    }

    #[must_use]
    pub fn coordinator(&self) -> DeviceId {
        self.coordinator
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    // -- registry --------------------------------------------------------

    #[must_use]
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(&id)
    }

    #[must_use]
    pub fn get_scene_by_name(&self, name: &str) -> Option<&Scene> {
        self.scenes.values().find(|s| s.name() == name)
    }

    /// All scenes, by ascending id.
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    #[must_use]
    pub fn number_of_scenes(&self) -> usize {
        self.scenes.len()
    }

    #[must_use]
    pub fn lowest_unused_scene_id(&self) -> Option<SceneId> {
        (1..=u8::MAX)
            .filter_map(|n| SceneId::new(n).ok())
            .find(|id| !self.scenes.contains_key(id))
    }

    #[must_use]
    pub fn controller(&self, id: DeviceId) -> Option<&SceneController> {
        self.controllers.get(id)
    }

    pub fn controllers(&self) -> impl Iterator<Item = &SceneController> {
        self.controllers.iter()
    }

    /// Scene triggered by `button` of `controller`, if any.
    #[must_use]
    pub fn scene_for_button(&self, controller: DeviceId, button: ButtonId) -> Option<SceneId> {
        self.index.get(&controller)?.get(&button).copied()
    }

    /// Create a scene with the lowest free id.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] when every id is taken.
    pub fn new_scene(&mut self, name: &str) -> Result<SceneId, SceneHubError> {
        self.new_scene_with_id(0, name)
    }

    /// Create a scene. An `id` of 0 picks the lowest free id.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::SceneIdOutOfRange`] above 255, checked first
    /// - [`CapacityError`] when every id is taken
    /// - [`ValidationError::SceneIdInUse`] when `id` already names a scene
    #[tracing::instrument(skip(self))]
    pub fn new_scene_with_id(&mut self, id: u32, name: &str) -> Result<SceneId, SceneHubError> {
        let requested = if id == 0 { None } else { Some(SceneId::from_u32(id)?) };
        if self.scenes.len() >= MAX_SCENES {
            return Err(CapacityError { max: MAX_SCENES }.into());
        }
        let id = match requested {
            Some(id) if self.scenes.contains_key(&id) => {
                return Err(ValidationError::SceneIdInUse(id).into());
            }
            Some(id) => id,
            None => self
                .lowest_unused_scene_id()
                .ok_or(CapacityError { max: MAX_SCENES })?,
        };
        self.scenes.insert(id, Scene::new(id, name));
        tracing::info!(scene = %id, "scene created");
        Ok(id)
    }

    /// Delete a scene, unindexing its buttons and forgetting controllers no
    /// other scene uses.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown scene.
    #[tracing::instrument(skip(self))]
    pub fn remove_scene(&mut self, id: SceneId) -> Result<Scene, SceneHubError> {
        let scene = self
            .scenes
            .remove(&id)
            .ok_or_else(|| NotFoundError::scene(id))?;
        for (controller, button) in scene.controllers() {
            self.unindex(controller, button);
        }
        tracing::info!(scene = %id, "scene removed");
        Ok(scene)
    }

    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown scene.
    pub fn set_scene_name(&mut self, id: SceneId, name: &str) -> Result<(), SceneHubError> {
        self.scene_mut(id)?.set_name(name);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown scene.
    pub fn set_dimming_duration(
        &mut self,
        id: SceneId,
        duration: DimmingDuration,
    ) -> Result<(), SceneHubError> {
        self.scene_mut(id)?.set_dimming_duration(duration);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown scene.
    pub fn set_override(&mut self, id: SceneId, override_level: bool) -> Result<(), SceneHubError> {
        self.scene_mut(id)?.set_override(override_level);
        Ok(())
    }

    // -- membership ------------------------------------------------------

    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown scene or device.
    #[tracing::instrument(skip(self))]
    pub fn add_device(&mut self, id: SceneId, device: DeviceId, value: u8) -> Result<(), SceneHubError> {
        let scene = self
            .scenes
            .get_mut(&id)
            .ok_or_else(|| NotFoundError::scene(id))?;
        scene.add_device(&self.directory, device, value)?;
        tracing::debug!(scene = %id, %device, value, "device added");
        Ok(())
    }

    /// Returns `true` if the device was a member.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown scene.
    #[tracing::instrument(skip(self))]
    pub fn remove_device(&mut self, id: SceneId, device: DeviceId) -> Result<bool, SceneHubError> {
        Ok(self.scene_mut(id)?.remove_device(device))
    }

    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown scene, or a device that is
    /// not a member.
    #[tracing::instrument(skip(self))]
    pub fn set_device_value(
        &mut self,
        id: SceneId,
        device: DeviceId,
        value: u8,
    ) -> Result<(), SceneHubError> {
        self.scene_mut(id)?.set_device_value(device, value)?;
        Ok(())
    }

    /// Bind `button` of `controller` to scene `id`, binding the controller
    /// itself on first use.
    ///
    /// # Errors
    ///
    /// - [`NotFoundError`] for an unknown scene or device
    /// - [`ValidationError::ButtonAlreadyBound`] when the button triggers
    ///   another scene
    /// - any [`SceneController::bind`] or [`Scene::put_scene_controller`]
    ///   rejection
    #[tracing::instrument(skip(self))]
    pub fn add_scene_controller(
        &mut self,
        id: SceneId,
        controller: DeviceId,
        button: ButtonId,
    ) -> Result<(), SceneHubError> {
        if !self.scenes.contains_key(&id) {
            return Err(NotFoundError::scene(id).into());
        }
        if let Some(scene) = self.scene_for_button(controller, button).filter(|s| *s != id) {
            return Err(ValidationError::ButtonAlreadyBound {
                controller,
                button,
                scene,
            }
            .into());
        }

        let result = self.bind_controller_button(id, controller, button);
        if let Err(err) = &result {
            tracing::warn!(scene = %id, %controller, %button, %err, "scene controller rejected");
            self.prune_controller(controller);
        }
        result
    }

    fn bind_controller_button(
        &mut self,
        id: SceneId,
        controller_id: DeviceId,
        button: ButtonId,
    ) -> Result<(), SceneHubError> {
        let controller = self.controllers.get_or_bind(
            controller_id,
            self.number_of_buttons,
            &self.directory,
            &self.channel,
        )?;
        let scene = self
            .scenes
            .get_mut(&id)
            .ok_or_else(|| NotFoundError::scene(id))?;
        let previous = scene.put_scene_controller(controller, button)?;
        self.index
            .entry(controller_id)
            .or_default()
            .insert(button, id);
        if let Some(previous) = previous.filter(|p| *p != button) {
            self.unindex(controller_id, previous);
        }
        tracing::info!(scene = %id, controller = %controller_id, %button, "scene controller bound");
        Ok(())
    }

    /// Returns the button the controller was using, if it was bound.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown scene.
    #[tracing::instrument(skip(self))]
    pub fn remove_scene_controller(
        &mut self,
        id: SceneId,
        controller: DeviceId,
    ) -> Result<Option<ButtonId>, SceneHubError> {
        let button = self.scene_mut(id)?.remove_scene_controller(controller);
        if let Some(button) = button {
            self.unindex(controller, button);
        }
        Ok(button)
    }

    // -- network operations ----------------------------------------------

    /// Run [`Scene::program`] for scene `id`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown scene, otherwise whatever
    /// programming fails with.
    #[tracing::instrument(skip(self))]
    pub fn program_scene(&mut self, id: SceneId) -> Result<ProgramSummary, SceneHubError> {
        let scene = self.scenes.get(&id).ok_or_else(|| NotFoundError::scene(id))?;
        scene.program(&self.controllers, &self.channel, self.coordinator)
    }

    /// Turn on the scene's button on every bound controller.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown scene, or a send failure.
    #[tracing::instrument(skip(self))]
    pub fn activate_scene(&mut self, id: SceneId) -> Result<usize, SceneHubError> {
        let scene = self.scenes.get(&id).ok_or_else(|| NotFoundError::scene(id))?;
        scene.activate(&mut self.controllers, &self.channel)
    }

    /// Ask every controller for its indicator. Recovers controllers whose
    /// confirmation was lost.
    ///
    /// # Errors
    ///
    /// Returns the first send failure.
    pub fn refresh_indicators(&mut self) -> Result<(), SceneHubError> {
        let ids: Vec<DeviceId> = self.controllers.iter().map(SceneController::device_id).collect();
        for id in ids {
            if let Some(controller) = self.controllers.get_mut(id) {
                controller.request_indicator(&self.channel)?;
            }
        }
        Ok(())
    }

    // -- inbound routing -------------------------------------------------

    /// Decode and route one frame. Malformed frames and failures are logged
    /// and dropped; nobody is waiting on the result.
    pub fn handle_frame(&mut self, frame: &InboundFrame) {
        let event = match InboundEvent::decode(frame) {
            Ok(Some(event)) => event,
            Ok(None) => return,
            Err(err) => {
                tracing::warn!(source = %frame.source, %err, "dropping malformed frame");
                return;
            }
        };
        let source = event.source();
        let age_ms = millis_since(frame.received_at);
        tracing::trace!(%source, age_ms, "routing event");
        if let Err(err) = self.handle_event(event) {
            tracing::warn!(%source, age_ms, %err, "failed to handle event");
        }
    }

    /// Route one decoded event.
    ///
    /// # Errors
    ///
    /// Returns send failures from the resulting activation or basic-report
    /// refresh. Synchronisation failures are logged per button. Events about
    /// unknown scenes or controllers are ignored, not errors.
    pub fn handle_event(&mut self, event: InboundEvent) -> Result<(), SceneHubError> {
        match event {
            InboundEvent::SceneActivation { source, activation } => {
                let Ok(id) = SceneId::new(activation.scene_id) else {
                    tracing::debug!(%source, "ignoring activation of scene 0");
                    return Ok(());
                };
                if !self.scenes.contains_key(&id) {
                    tracing::debug!(%source, scene = %id, "ignoring activation of unknown scene");
                    return Ok(());
                }
                tracing::info!(%source, scene = %id, "scene activation received");
                self.activate_scene(id).map(|_| ())
            }
            InboundEvent::IndicatorReport { source, bitmask } => {
                self.handle_indicator_report(source, bitmask)
            }
            InboundEvent::BasicReport { source, value } => {
                let Some(controller) = self.controllers.get_mut(source) else {
                    return Ok(());
                };
                tracing::debug!(%source, value, "button press, refreshing indicator");
                controller.handle_basic_report(&self.channel)
            }
            InboundEvent::ActuatorConfReport { source, report } => {
                tracing::debug!(
                    %source,
                    scene = report.scene_id,
                    level = report.level,
                    duration = %report.duration,
                    "scene actuator configuration reported"
                );
                Ok(())
            }
            InboundEvent::ControllerConfReport { source, report } => {
                let expected = self
                    .scene_for_button(source, ButtonId::from(report.group_id))
                    .map(SceneId::as_u8);
                match expected {
                    Some(scene) if scene != report.scene_id => tracing::warn!(
                        %source,
                        group = report.group_id,
                        expected = scene,
                        reported = report.scene_id,
                        "controller group bound to a different scene, reprogram needed"
                    ),
                    _ => tracing::debug!(
                        %source,
                        group = report.group_id,
                        scene = report.scene_id,
                        "scene controller configuration reported"
                    ),
                }
                Ok(())
            }
            InboundEvent::Replication { source, report } => {
                tracing::debug!(%source, ?report, name = ?report.name(), "controller replication received");
                Ok(())
            }
        }
    }

    fn handle_indicator_report(&mut self, source: DeviceId, bitmask: u8) -> Result<(), SceneHubError> {
        let Some(buttons) = self.index.get(&source) else {
            tracing::debug!(%source, "indicator report from unindexed device");
            return Ok(());
        };
        let Some(controller) = self.controllers.get_mut(source) else {
            return Ok(());
        };
        let Some(previous) = controller.handle_indicator_report(bitmask) else {
            tracing::debug!(%source, bitmask, "first indicator report, nothing to compare");
            return Ok(());
        };
        let changed = previous ^ bitmask;
        if changed == 0 {
            return Ok(());
        }

        let transitions: Vec<(SceneId, ButtonId, bool)> = (0..8u8)
            .filter(|bit| changed & (1 << bit) != 0)
            .filter_map(|bit| {
                let button = ButtonId::from(bit + 1);
                let scene = buttons.get(&button)?;
                Some((*scene, button, bitmask & (1 << bit) != 0))
            })
            .collect();

        for (id, button, on) in transitions {
            let Some(scene) = self.scenes.get(&id) else {
                continue;
            };
            if !scene.is_scene_controller_bound(source, button) {
                continue;
            }
            tracing::debug!(%source, %button, on, scene = %id, "indicator changed");
            if let Err(err) = scene.sync_controllers(source, on, &mut self.controllers, &self.channel) {
                tracing::warn!(%source, %button, scene = %id, %err, "unable to sync controllers");
            }
        }
        Ok(())
    }

    // -- persistence -----------------------------------------------------

    /// Capture the configuration of every scene.
    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            saved_at: Some(now()),
            scenes: self.scenes.values().map(Scene::to_record).collect(),
        }
    }

    /// Recreate scenes from a snapshot through the regular operations.
    ///
    /// Scenes whose id is taken, devices the directory no longer knows and
    /// controllers that fail to bind are logged and skipped. Returns the
    /// number of scenes restored.
    #[tracing::instrument(skip_all, fields(scenes = snapshot.scenes.len()))]
    pub fn restore(&mut self, snapshot: &SceneSnapshot) -> usize {
        let mut restored = 0;
        for record in &snapshot.scenes {
            let id = match self.new_scene_with_id(u32::from(record.id.as_u8()), &record.name) {
                Ok(id) => id,
                Err(err) => {
                    tracing::warn!(scene = %record.id, %err, "skipping scene");
                    continue;
                }
            };
            if let Some(scene) = self.scenes.get_mut(&id) {
                scene.set_dimming_duration(record.duration);
                scene.set_override(record.override_level);
            }
            for device in &record.devices {
                if let Err(err) = self.add_device(id, device.device_id, device.value) {
                    tracing::warn!(scene = %id, device = %device.device_id, %err, "skipping device");
                }
            }
            for controller in &record.controllers {
                if let Err(err) = self.add_scene_controller(id, controller.device_id, controller.button) {
                    tracing::warn!(scene = %id, controller = %controller.device_id, %err, "skipping controller");
                }
            }
            restored += 1;
        }
        tracing::info!(restored, "scenes restored");
        restored
    }

    // -- helpers ---------------------------------------------------------

    fn scene_mut(&mut self, id: SceneId) -> Result<&mut Scene, NotFoundError> {
        self.scenes.get_mut(&id).ok_or_else(|| NotFoundError::scene(id))
    }

    fn unindex(&mut self, controller: DeviceId, button: ButtonId) {
        if let Some(buttons) = self.index.get_mut(&controller) {
            buttons.remove(&button);
        }
        self.prune_controller(controller);
    }

    /// Forget a controller once no scene uses any of its buttons.
    fn prune_controller(&mut self, controller: DeviceId) {
        let in_use = self.index.get(&controller).is_some_and(|b| !b.is_empty());
        if !in_use {
            self.index.remove(&controller);
            if self.controllers.remove(controller).is_some() {
                tracing::debug!(%controller, "scene controller released");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::{RecordingChannel, StaticDirectory, controller, dimmer, scene_dimmer};
    use scenehub_domain::codec::activation::SceneActivation;
    use scenehub_domain::codec::controller_conf::ControllerConfReport;
    use scenehub_domain::command_class::CommandClass;

    type Manager = SceneManager<StaticDirectory, Arc<RecordingChannel>>;

    fn id(n: u8) -> DeviceId {
        DeviceId::from(n)
    }

    fn b(n: u8) -> ButtonId {
        ButtonId::from(n)
    }

    fn scene_id(n: u8) -> SceneId {
        SceneId::new(n).unwrap()
    }

    fn manager() -> (Manager, Arc<RecordingChannel>) {
        let channel = Arc::new(RecordingChannel::default());
        let directory = StaticDirectory::default()
            .with(controller(2))
            .with(controller(3))
            .with(controller(4))
            .with(dimmer(10))
            .with(scene_dimmer(12));
        (SceneManager::new(directory, Arc::clone(&channel)), channel)
    }

    /// Scene 1 on controller 2 button 1 and controller 3 button 2, with both
    /// indicators confirmed off.
    fn two_controller_scene() -> (Manager, Arc<RecordingChannel>) {
        let (mut manager, channel) = manager();
        let scene = manager.new_scene("living").unwrap();
        manager.add_scene_controller(scene, id(2), b(1)).unwrap();
        manager.add_scene_controller(scene, id(3), b(2)).unwrap();
        for ctrl in [2, 3] {
            manager
                .handle_event(InboundEvent::IndicatorReport { source: id(ctrl), bitmask: 0 })
                .unwrap();
        }
        channel.take();
        (manager, channel)
    }

    #[test]
    fn should_allocate_lowest_free_id() {
        let (mut manager, _) = manager();
        assert_eq!(manager.new_scene("a").unwrap(), scene_id(1));
        assert_eq!(manager.new_scene("b").unwrap(), scene_id(2));
        manager.remove_scene(scene_id(1)).unwrap();
        assert_eq!(manager.new_scene("c").unwrap(), scene_id(1));
    }

    #[test]
    fn should_return_capacity_error_when_all_ids_used() {
        let (mut manager, _) = manager();
        let mut seen = std::collections::BTreeSet::new();
        for n in 0..MAX_SCENES {
            let id = manager.new_scene(&format!("scene {n}")).unwrap();
            assert!(seen.insert(id), "id {id} handed out twice");
        }

        let result = manager.new_scene("one too many");

        assert!(matches!(result, Err(SceneHubError::Capacity(_))));
        assert_eq!(manager.lowest_unused_scene_id(), None);
    }

    #[test]
    fn should_reject_explicit_ids_out_of_range_or_in_use() {
        let (mut manager, _) = manager();
        assert!(matches!(
            manager.new_scene_with_id(256, "x"),
            Err(SceneHubError::Validation(ValidationError::SceneIdOutOfRange(256)))
        ));
        assert_eq!(manager.new_scene_with_id(7, "x").unwrap(), scene_id(7));
        assert!(matches!(
            manager.new_scene_with_id(7, "y"),
            Err(SceneHubError::Validation(ValidationError::SceneIdInUse(_)))
        ));
    }

    #[test]
    fn should_reject_out_of_range_id_before_capacity() {
        let (mut manager, _) = manager();
        for n in 0..MAX_SCENES {
            manager.new_scene(&format!("scene {n}")).unwrap();
        }

        assert!(matches!(
            manager.new_scene_with_id(300, "x"),
            Err(SceneHubError::Validation(ValidationError::SceneIdOutOfRange(300)))
        ));
        assert!(matches!(
            manager.new_scene_with_id(0, "x"),
            Err(SceneHubError::Capacity(_))
        ));
    }

    #[test]
    fn should_return_not_found_for_unknown_scene() {
        let (mut manager, _) = manager();
        let missing = scene_id(9);
        assert!(matches!(
            manager.add_device(missing, id(10), 1),
            Err(SceneHubError::NotFound(_))
        ));
        assert!(matches!(
            manager.set_scene_name(missing, "x"),
            Err(SceneHubError::NotFound(_))
        ));
        assert!(matches!(
            manager.add_scene_controller(missing, id(2), b(1)),
            Err(SceneHubError::NotFound(_))
        ));
        assert!(matches!(manager.program_scene(missing), Err(SceneHubError::NotFound(_))));
        assert!(matches!(manager.activate_scene(missing), Err(SceneHubError::NotFound(_))));
    }

    #[test]
    fn should_find_scene_by_name() {
        let (mut manager, _) = manager();
        manager.new_scene("kitchen").unwrap();
        let id = manager.new_scene("garden").unwrap();
        assert_eq!(manager.get_scene_by_name("garden").unwrap().id(), id);
        assert!(manager.get_scene_by_name("attic").is_none());
    }

    #[test]
    fn should_reject_button_bound_to_another_scene() {
        let (mut manager, _) = manager();
        let first = manager.new_scene("first").unwrap();
        let second = manager.new_scene("second").unwrap();
        manager.add_scene_controller(first, id(2), b(1)).unwrap();

        let result = manager.add_scene_controller(second, id(2), b(1));

        assert!(matches!(
            result,
            Err(SceneHubError::Validation(ValidationError::ButtonAlreadyBound { .. }))
        ));
        assert_eq!(manager.scene_for_button(id(2), b(1)), Some(first));
    }

    #[test]
    fn should_share_controller_between_scenes() {
        let (mut manager, _) = manager();
        let first = manager.new_scene("first").unwrap();
        let second = manager.new_scene("second").unwrap();
        manager.add_scene_controller(first, id(2), b(1)).unwrap();
        manager.add_scene_controller(second, id(2), b(2)).unwrap();

        assert_eq!(manager.controllers().count(), 1);
        assert_eq!(manager.scene_for_button(id(2), b(2)), Some(second));
    }

    #[test]
    fn should_move_index_entry_when_controller_rebound_to_other_button() {
        let (mut manager, _) = manager();
        let scene = manager.new_scene("s").unwrap();
        manager.add_scene_controller(scene, id(2), b(1)).unwrap();
        manager.add_scene_controller(scene, id(2), b(3)).unwrap();

        assert_eq!(manager.scene_for_button(id(2), b(1)), None);
        assert_eq!(manager.scene_for_button(id(2), b(3)), Some(scene));
    }

    #[test]
    fn should_not_keep_controller_when_binding_fails() {
        let (mut manager, _) = manager();
        let scene = manager.new_scene("s").unwrap();

        assert!(manager.add_scene_controller(scene, id(10), b(1)).is_err());
        assert!(manager.add_scene_controller(scene, id(2), b(0)).is_err());

        assert_eq!(manager.controllers().count(), 0);
    }

    #[test]
    fn should_clean_index_when_scene_removed() {
        let (mut manager, _) = two_controller_scene();
        manager.remove_scene(scene_id(1)).unwrap();

        assert_eq!(manager.scene_for_button(id(2), b(1)), None);
        assert_eq!(manager.controllers().count(), 0);
    }

    #[test]
    fn should_unindex_when_scene_controller_removed() {
        let (mut manager, _) = two_controller_scene();

        let button = manager.remove_scene_controller(scene_id(1), id(3)).unwrap();

        assert_eq!(button, Some(b(2)));
        assert_eq!(manager.scene_for_button(id(3), b(2)), None);
        assert!(manager.controller(id(3)).is_none());
        assert!(manager.controller(id(2)).is_some());
    }

    #[test]
    fn should_sync_other_controller_when_indicator_changes() {
        let (mut manager, channel) = two_controller_scene();

        manager
            .handle_event(InboundEvent::IndicatorReport {
                source: id(2),
                bitmask: 0b0000_0001,
            })
            .unwrap();

        let frames = channel.take_raw();
        assert_eq!(
            frames,
            vec![
                (3, CommandClass::Indicator, vec![0x01, 0b0000_0010]),
                (3, CommandClass::Indicator, vec![0x02]),
            ]
        );
        assert!(manager.controller(id(3)).unwrap().is_button_on(b(2)));
    }

    #[test]
    fn should_not_sync_when_report_matches_last_report() {
        let (mut manager, channel) = two_controller_scene();
        manager
            .handle_event(InboundEvent::IndicatorReport { source: id(2), bitmask: 0 })
            .unwrap();
        assert!(channel.frames().is_empty());
    }

    #[test]
    fn should_not_propagate_set_the_device_never_applied() {
        let (mut manager, channel) = two_controller_scene();
        manager.activate_scene(scene_id(1)).unwrap();
        channel.take();

        manager
            .handle_event(InboundEvent::IndicatorReport { source: id(2), bitmask: 0 })
            .unwrap();

        assert!(channel.frames().is_empty());
        let origin = manager.controller(id(2)).unwrap();
        assert!(!origin.is_button_on(b(1)));
        assert!(origin.is_indicator_state_valid());
        assert!(manager.controller(id(3)).unwrap().is_button_on(b(2)));
    }

    #[test]
    fn should_not_sync_on_first_report_after_bind() {
        let (mut manager, channel) = manager();
        let scene = manager.new_scene("hall").unwrap();
        manager.add_scene_controller(scene, id(2), b(1)).unwrap();
        manager.add_scene_controller(scene, id(3), b(1)).unwrap();
        channel.take();

        manager
            .handle_event(InboundEvent::IndicatorReport {
                source: id(2),
                bitmask: 0b0000_0001,
            })
            .unwrap();

        assert!(channel.frames().is_empty());
        assert_eq!(manager.controller(id(2)).unwrap().reported(), Some(0b0000_0001));
    }

    #[test]
    fn should_keep_syncing_other_buttons_when_one_controller_unreachable() {
        let (mut manager, channel) = two_controller_scene();
        let other = manager.new_scene("porch").unwrap();
        manager.add_scene_controller(other, id(2), b(3)).unwrap();
        manager.add_scene_controller(other, id(4), b(1)).unwrap();
        manager
            .handle_event(InboundEvent::IndicatorReport { source: id(4), bitmask: 0 })
            .unwrap();
        channel.take();
        channel.unreachable(id(3));

        manager
            .handle_event(InboundEvent::IndicatorReport {
                source: id(2),
                bitmask: 0b0000_0101,
            })
            .unwrap();

        assert_eq!(
            channel.take_raw(),
            vec![
                (4, CommandClass::Indicator, vec![0x01, 0b0000_0001]),
                (4, CommandClass::Indicator, vec![0x02]),
            ]
        );
    }

    #[test]
    fn should_route_frame_received_earlier() {
        let (mut manager, channel) = two_controller_scene();
        let mut frame = InboundFrame::from_class(id(2), CommandClass::Indicator, vec![0x03, 0x01]);
        frame.received_at = now() - chrono::TimeDelta::seconds(5);

        manager.handle_frame(&frame);

        assert_eq!(channel.take_raw().len(), 2);
        assert!(manager.controller(id(3)).unwrap().is_button_on(b(2)));
    }

    #[test]
    fn should_ignore_indicator_report_from_unknown_device() {
        let (mut manager, channel) = two_controller_scene();
        manager
            .handle_event(InboundEvent::IndicatorReport {
                source: id(4),
                bitmask: 0xFF,
            })
            .unwrap();
        assert!(channel.frames().is_empty());
    }

    #[test]
    fn should_activate_scene_on_activation_report() {
        let (mut manager, _) = two_controller_scene();

        manager
            .handle_event(InboundEvent::SceneActivation {
                source: id(40),
                activation: SceneActivation {
                    scene_id: 1,
                    duration: None,
                },
            })
            .unwrap();

        assert!(manager.controller(id(2)).unwrap().is_button_on(b(1)));
        assert!(manager.controller(id(3)).unwrap().is_button_on(b(2)));
    }

    #[test]
    fn should_ignore_activation_of_unknown_scene() {
        let (mut manager, channel) = two_controller_scene();
        manager
            .handle_event(InboundEvent::SceneActivation {
                source: id(40),
                activation: SceneActivation {
                    scene_id: 9,
                    duration: None,
                },
            })
            .unwrap();
        assert!(channel.frames().is_empty());
    }

    #[test]
    fn should_request_indicator_on_basic_report_from_controller() {
        let (mut manager, channel) = two_controller_scene();
        manager
            .handle_event(InboundEvent::BasicReport { source: id(2), value: 0xFF })
            .unwrap();
        assert_eq!(
            channel.take_raw(),
            vec![(2, CommandClass::Indicator, vec![0x02])]
        );
        assert!(!manager.controller(id(2)).unwrap().is_indicator_state_valid());
    }

    #[test]
    fn should_accept_controller_conf_report_without_side_effects() {
        let (mut manager, channel) = two_controller_scene();
        manager
            .handle_event(InboundEvent::ControllerConfReport {
                source: id(2),
                report: ControllerConfReport {
                    group_id: 1,
                    scene_id: 5,
                    duration: DimmingDuration::default(),
                },
            })
            .unwrap();
        assert!(channel.frames().is_empty());
    }

    #[test]
    fn should_drop_malformed_and_foreign_frames() {
        let (mut manager, channel) = two_controller_scene();
        manager.handle_frame(&InboundFrame::from_class(id(2), CommandClass::Indicator, vec![0x03]));
        manager.handle_frame(&InboundFrame::new(id(2), 0x25, vec![0x03, 0xFF]));
        assert!(channel.frames().is_empty());
    }

    #[test]
    fn should_program_kitchen_end_to_end() {
        let (mut manager, channel) = manager();
        let kitchen = manager.new_scene("kitchen").unwrap();
        assert_eq!(kitchen, scene_id(1));
        manager.add_device(kitchen, id(10), 75).unwrap();
        manager.add_scene_controller(kitchen, id(2), b(1)).unwrap();
        channel.take();

        manager.program_scene(kitchen).unwrap();

        let frames = channel.take_raw();
        assert_eq!(
            &frames[..4],
            &[
                (2, CommandClass::Association, vec![0x04, 1]),
                (2, CommandClass::Association, vec![0x01, 1, 10]),
                (2, CommandClass::Configuration, vec![0x04, 1, 1, 75]),
                (2, CommandClass::SceneControllerConf, vec![0x01, 1, 1, 3]),
            ]
        );

        manager.activate_scene(kitchen).unwrap();
        assert!(manager.controller(id(2)).unwrap().is_button_on(b(1)));
    }

    #[test]
    fn should_restore_snapshot_into_empty_manager() {
        let (mut source, _) = two_controller_scene();
        source.add_device(scene_id(1), id(10), 40).unwrap();
        source
            .set_dimming_duration(scene_id(1), DimmingDuration::instant())
            .unwrap();
        let snapshot = source.snapshot();

        let (mut target, _) = manager();
        let restored = target.restore(&snapshot);

        assert_eq!(restored, 1);
        let scene = target.scene(scene_id(1)).unwrap();
        assert_eq!(scene.name(), "living");
        assert_eq!(scene.dimming_duration(), DimmingDuration::instant());
        assert_eq!(scene.device(id(10)).unwrap().value(), 40);
        assert_eq!(target.scene_for_button(id(3), b(2)), Some(scene_id(1)));
    }

    #[test]
    fn should_skip_unresolvable_entries_when_restoring() {
        let (mut source, _) = manager();
        let scene = source.new_scene("s").unwrap();
        source.add_device(scene, id(12), 10).unwrap();
        let snapshot = source.snapshot();

        let channel = Arc::new(RecordingChannel::default());
        let mut target = SceneManager::new(StaticDirectory::default(), channel);
        target.new_scene("occupies id 1").unwrap();

        assert_eq!(target.restore(&snapshot), 0);
        assert_eq!(target.number_of_scenes(), 1);
    }

    #[test]
    fn should_request_every_indicator_on_refresh() {
        let (mut manager, channel) = two_controller_scene();
        manager.refresh_indicators().unwrap();
        let destinations: Vec<_> = channel.take().into_iter().map(|f| f.destination).collect();
        assert_eq!(destinations, vec![id(2), id(3)]);
    }
}
