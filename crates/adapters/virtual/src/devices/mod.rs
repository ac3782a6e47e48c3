//! Simulated devices: scene controllers and dimmers.
//!
//! Each device consumes the frames addressed to it and answers with the
//! frames a real node would send back.

mod controller;
mod dimmer;

pub use controller::VirtualController;
pub use dimmer::VirtualDimmer;

use scenehub_domain::device::Device;
use scenehub_domain::frame::{InboundFrame, OutboundFrame};

/// Wrapper enum for the concrete virtual device types.
pub enum VirtualDevice {
    Controller(VirtualController),
    Dimmer(VirtualDimmer),
}

impl VirtualDevice {
    /// Descriptor handed out by the device directory.
    #[must_use]
    pub fn descriptor(&self) -> Device {
        match self {
            Self::Controller(d) => d.descriptor(),
            Self::Dimmer(d) => d.descriptor(),
        }
    }

    /// Apply a frame, returning the replies.
    pub fn receive(&mut self, frame: &OutboundFrame) -> Vec<InboundFrame> {
        match self {
            Self::Controller(d) => d.receive(frame),
            Self::Dimmer(d) => d.receive(frame),
        }
    }
}
