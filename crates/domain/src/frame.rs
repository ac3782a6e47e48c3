//! Frames exchanged with the transport: a command-class payload addressed
//! to (or received from) one device.

use std::fmt;

use crate::command_class::CommandClass;
use crate::id::DeviceId;
use crate::time::{Timestamp, now};

/// A frame queued for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundFrame {
    pub destination: DeviceId,
    pub command_class: CommandClass,
    /// Command byte followed by its parameters.
    pub payload: Vec<u8>,
}

impl OutboundFrame {
    #[must_use]
    pub fn new(destination: DeviceId, command_class: CommandClass, payload: Vec<u8>) -> Self {
        Self {
            destination,
            command_class,
            payload,
        }
    }

    /// Command byte, if the payload is non-empty.
    #[must_use]
    pub fn command(&self) -> Option<u8> {
        self.payload.first().copied()
    }
}

impl fmt::Display for OutboundFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-> {} {} {:02X?}", self.destination, self.command_class, self.payload)
    }
}

/// A frame received from the network.
///
/// The command class is kept as a raw byte: classes this subsystem does not
/// know about are still delivered, and simply ignored when decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    pub source: DeviceId,
    pub command_class: u8,
    pub payload: Vec<u8>,
    pub received_at: Timestamp,
}

impl InboundFrame {
    /// Stamp a frame with the current time.
    #[must_use]
    pub fn new(source: DeviceId, command_class: u8, payload: Vec<u8>) -> Self {
        Self {
            source,
            command_class,
            payload,
            received_at: now(),
        }
    }

    /// Build a frame for a known command class.
    #[must_use]
    pub fn from_class(source: DeviceId, command_class: CommandClass, payload: Vec<u8>) -> Self {
        Self::new(source, command_class.id(), payload)
    }
}
