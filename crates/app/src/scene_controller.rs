//! Scene controller — the cached indicator bitmask of one physical
//! controller and the state machine that keeps it in step with the device.
//!
//! ```text
//! Unbound ──bind──▶ BoundUnknown ──GET──▶ BoundPending ◀──SET+GET── BoundValid
//!                                              │                        ▲
//!                                              └────────REPORT──────────┘
//! ```
//!
//! Every local mutation is optimistic: the cache is flipped first, a SET is
//! queued, then a GET asks the device to confirm. The cache is only trusted
//! again once a REPORT comes back.

use std::collections::BTreeMap;

use scenehub_domain::codec::{association, indicator};
use scenehub_domain::command_class::CommandClass;
use scenehub_domain::device::{COOPER_MANUFACTURER_ID, DeviceClass};
use scenehub_domain::error::{NotFoundError, SceneHubError, UnsupportedError, ValidationError};
use scenehub_domain::frame::OutboundFrame;
use scenehub_domain::id::{ButtonId, DeviceId};

use crate::ports::{DeviceDirectory, SendChannel};

/// Buttons assumed on a controller until configured otherwise.
pub const DEFAULT_NUMBER_OF_BUTTONS: u8 = 5;

/// Where the cached indicator stands relative to the physical device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    /// Not attached to a scene-controller device yet.
    Unbound,
    /// Bound, nothing known about the indicator.
    BoundUnknown,
    /// A SET or GET is in flight, the cache may be wrong.
    BoundPending,
    /// The cache matches the last REPORT.
    BoundValid,
}

/// One physical scene controller.
#[derive(Debug, Clone)]
pub struct SceneController {
    device_id: DeviceId,
    state: IndicatorState,
    indicator: u8,
    reported: Option<u8>,
    number_of_buttons: u8,
    portable: bool,
    cooper: bool,
    supports_indicator: bool,
    supports_association: bool,
    supports_configuration: bool,
}

impl SceneController {
    /// An unbound controller for `device_id`.
    #[must_use]
    pub fn new(device_id: DeviceId) -> Self {
        Self {
            device_id,
            state: IndicatorState::Unbound,
            indicator: 0,
            reported: None,
            number_of_buttons: DEFAULT_NUMBER_OF_BUTTONS,
            portable: false,
            cooper: false,
            supports_indicator: false,
            supports_association: false,
            supports_configuration: false,
        }
    }

    /// Attach to the device behind `device_id`.
    ///
    /// When the device has an indicator, a GET is queued straight away.
    ///
    /// # Errors
    ///
    /// - [`NotFoundError`] if the directory does not know the device
    /// - [`ValidationError::NotASceneController`] if its class is not a
    ///   scene controller
    /// - [`UnsupportedError`] if it lacks scene controller configuration
    ///
    /// The controller stays [`IndicatorState::Unbound`] on failure.
    pub fn bind(
        &mut self,
        directory: &impl DeviceDirectory,
        channel: &impl SendChannel,
    ) -> Result<(), SceneHubError> {
        let device = directory
            .get_device(self.device_id)
            .ok_or_else(|| NotFoundError::device(self.device_id))?;
        if !device.class.is_scene_controller() {
            return Err(ValidationError::NotASceneController(self.device_id).into());
        }
        if !device.supports(CommandClass::SceneControllerConf) {
            return Err(UnsupportedError {
                device: self.device_id,
                command_class: CommandClass::SceneControllerConf,
            }
            .into());
        }

        self.portable = device.class == DeviceClass::PortableSceneController;
        self.cooper = device.manufacturer == Some(COOPER_MANUFACTURER_ID);
        self.supports_indicator = device.supports(CommandClass::Indicator);
        self.supports_association = device.supports(CommandClass::Association);
        self.supports_configuration = device.supports(CommandClass::Configuration);
        self.state = IndicatorState::BoundUnknown;
        self.reported = None;
        tracing::debug!(
            controller = %self.device_id,
            portable = self.portable,
            cooper = self.cooper,
            indicator = self.supports_indicator,
            "scene controller bound"
        );

        if self.supports_indicator {
            self.request_indicator(channel)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    #[must_use]
    pub fn state(&self) -> IndicatorState {
        self.state
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.state != IndicatorState::Unbound
    }

    /// Whether the cached bitmask has been confirmed by a REPORT since the
    /// last mutation.
    #[must_use]
    pub fn is_indicator_state_valid(&self) -> bool {
        self.state == IndicatorState::BoundValid
    }

    /// Raw cached bitmask, bit 0 = button 1.
    #[must_use]
    pub fn indicator(&self) -> u8 {
        self.indicator
    }

    #[must_use]
    pub fn is_portable(&self) -> bool {
        self.portable
    }

    #[must_use]
    pub fn is_cooper(&self) -> bool {
        self.cooper
    }

    #[must_use]
    pub fn supports_indicator(&self) -> bool {
        self.supports_indicator
    }

    #[must_use]
    pub fn supports_association(&self) -> bool {
        self.supports_association
    }

    #[must_use]
    pub fn supports_configuration(&self) -> bool {
        self.supports_configuration
    }

    #[must_use]
    pub fn number_of_buttons(&self) -> u8 {
        self.number_of_buttons
    }

    /// Change how many buttons the controller exposes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ButtonCountOutOfRange`] outside `2..=8`;
    /// the indicator is a single byte.
    pub fn set_number_of_buttons(&mut self, number_of_buttons: u8) -> Result<(), ValidationError> {
        if !(2..=8).contains(&number_of_buttons) {
            return Err(ValidationError::ButtonCountOutOfRange(number_of_buttons));
        }
        self.number_of_buttons = number_of_buttons;
        Ok(())
    }

    /// Whether `button` can be bound or driven: `1 <= button < number_of_buttons`.
    ///
    /// The top physical button is reached by raising `number_of_buttons`.
    #[must_use]
    pub fn is_button_id_valid(&self, button: ButtonId) -> bool {
        (1..self.number_of_buttons).contains(&button.as_u8())
    }

    /// Cached state of `button`. Does not require the cache to be valid.
    #[must_use]
    pub fn is_button_on(&self, button: ButtonId) -> bool {
        button
            .indicator_bit()
            .is_some_and(|bit| self.indicator & (1 << bit) != 0)
    }

    /// ON/OFF state of every button, button 1 first.
    #[must_use]
    pub fn buttons_state(&self) -> Vec<bool> {
        (1..=self.number_of_buttons)
            .map(|b| self.is_button_on(ButtonId::from(b)))
            .collect()
    }

    /// Turn a button's indicator on. Returns `false` if the cache already
    /// showed it on and nothing was sent.
    ///
    /// # Errors
    ///
    /// See [`SceneController::set_button`].
    pub fn set_button_on(
        &mut self,
        button: ButtonId,
        channel: &impl SendChannel,
    ) -> Result<bool, SceneHubError> {
        self.set_button(button, true, channel)
    }

    /// Turn a button's indicator off. Returns `false` if the cache already
    /// showed it off and nothing was sent.
    ///
    /// # Errors
    ///
    /// See [`SceneController::set_button`].
    pub fn set_button_off(
        &mut self,
        button: ButtonId,
        channel: &impl SendChannel,
    ) -> Result<bool, SceneHubError> {
        self.set_button(button, false, channel)
    }

    /// Drive one button's indicator.
    ///
    /// The comparison uses the cached bitmask, which may not be confirmed
    /// yet. A stale cache can suppress a SET the device actually needed.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::ControllerNotBound`] before [`SceneController::bind`]
    /// - [`ValidationError::InvalidButton`] for a button outside the valid range
    /// - [`SceneHubError::Transport`] if the channel rejects the frames
    pub fn set_button(
        &mut self,
        button: ButtonId,
        on: bool,
        channel: &impl SendChannel,
    ) -> Result<bool, SceneHubError> {
        if !self.is_bound() {
            return Err(ValidationError::ControllerNotBound(self.device_id).into());
        }
        let invalid = ValidationError::InvalidButton {
            controller: self.device_id,
            button,
        };
        if !self.is_button_id_valid(button) {
            return Err(invalid.into());
        }
        let Some(bit) = button.indicator_bit() else {
            return Err(invalid.into());
        };
        if self.is_button_on(button) == on {
            tracing::debug!(
                controller = %self.device_id,
                %button,
                on,
                valid = self.is_indicator_state_valid(),
                "indicator already in target state, skipping set"
            );
            return Ok(false);
        }
        let bitmask = if on {
            self.indicator | (1 << bit)
        } else {
            self.indicator & !(1 << bit)
        };
        self.set_indicator(bitmask, channel)?;
        Ok(true)
    }

    /// Replace the whole indicator bitmask. Returns the previous bitmask.
    ///
    /// Nothing is sent when the bitmask does not change. Without indicator
    /// support only the cache is updated.
    ///
    /// # Errors
    ///
    /// Returns [`SceneHubError::Transport`] if the channel rejects the frames;
    /// the cache keeps the new value and stays pending.
    pub fn set_indicator(
        &mut self,
        bitmask: u8,
        channel: &impl SendChannel,
    ) -> Result<u8, SceneHubError> {
        let previous = self.indicator;
        if previous == bitmask {
            return Ok(previous);
        }
        self.indicator = bitmask;
        if !self.supports_indicator {
            return Ok(previous);
        }
        self.state = IndicatorState::BoundPending;
        tracing::debug!(
            controller = %self.device_id,
            previous,
            bitmask,
            "setting indicator"
        );
        channel.send(OutboundFrame::new(
            self.device_id,
            CommandClass::Indicator,
            indicator::encode_set(u32::from(bitmask))?,
        ))?;
        self.request_indicator(channel)?;
        Ok(previous)
    }

    /// Queue an indicator GET and mark the cache pending.
    ///
    /// # Errors
    ///
    /// Returns [`SceneHubError::Transport`] if the channel rejects the frame.
    pub fn request_indicator(&mut self, channel: &impl SendChannel) -> Result<(), SceneHubError> {
        if !self.supports_indicator {
            return Ok(());
        }
        self.state = IndicatorState::BoundPending;
        channel.send(OutboundFrame::new(
            self.device_id,
            CommandClass::Indicator,
            indicator::encode_get(),
        ))
    }

    /// Bitmask carried by the last REPORT, `None` until the first one.
    ///
    /// Unlike [`SceneController::indicator`] this never holds an optimistic
    /// guess.
    #[must_use]
    pub fn reported(&self) -> Option<u8> {
        self.reported
    }

    /// Apply an indicator REPORT from the device. Returns the bitmask of the
    /// previous REPORT so the caller can see which buttons the device itself
    /// changed; a SET that never took effect does not show up as a change.
    pub fn handle_indicator_report(&mut self, bitmask: u8) -> Option<u8> {
        self.indicator = bitmask;
        if self.is_bound() {
            self.state = IndicatorState::BoundValid;
        }
        self.reported.replace(bitmask)
    }

    /// A Basic report means a button was pressed, but not which one:
    /// invalidate and ask for the indicator again.
    ///
    /// # Errors
    ///
    /// Returns [`SceneHubError::Transport`] if the channel rejects the GET.
    pub fn handle_basic_report(&mut self, channel: &impl SendChannel) -> Result<(), SceneHubError> {
        self.request_indicator(channel)
    }

    /// Remove every device from association group `group`.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedError`] if the controller has no association
    /// support, or a transport/encoding error from sending.
    pub fn reset_associations(
        &self,
        group: ButtonId,
        channel: &impl SendChannel,
    ) -> Result<(), SceneHubError> {
        if !self.supports_association {
            return Err(UnsupportedError {
                device: self.device_id,
                command_class: CommandClass::Association,
            }
            .into());
        }
        channel.send(OutboundFrame::new(
            self.device_id,
            CommandClass::Association,
            association::encode_remove_all(u32::from(group.as_u8()))?,
        ))
    }
}

/// Controllers keyed by device id. A physical controller has a single
/// entry no matter how many scenes its buttons are bound to.
#[derive(Debug, Default)]
pub struct ControllerRegistry {
    controllers: BTreeMap<DeviceId, SceneController>,
}

impl ControllerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: DeviceId) -> Option<&SceneController> {
        self.controllers.get(&id)
    }

    pub fn get_mut(&mut self, id: DeviceId) -> Option<&mut SceneController> {
        self.controllers.get_mut(&id)
    }

    #[must_use]
    pub fn contains(&self, id: DeviceId) -> bool {
        self.controllers.contains_key(&id)
    }

    /// Return the controller for `id`, binding a new one on first use.
    ///
    /// # Errors
    ///
    /// Propagates [`SceneController::bind`] failures; nothing is registered
    /// in that case.
    pub fn get_or_bind(
        &mut self,
        id: DeviceId,
        number_of_buttons: u8,
        directory: &impl DeviceDirectory,
        channel: &impl SendChannel,
    ) -> Result<&mut SceneController, SceneHubError> {
        if !self.controllers.contains_key(&id) {
            let mut controller = SceneController::new(id);
            controller.set_number_of_buttons(number_of_buttons)?;
            controller.bind(directory, channel)?;
            self.controllers.insert(id, controller);
        }
        self.controllers
            .get_mut(&id)
            .ok_or_else(|| NotFoundError::controller(id).into())
    }

    pub fn remove(&mut self, id: DeviceId) -> Option<SceneController> {
        self.controllers.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneController> {
        self.controllers.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}
