//! Dimming duration — the transition time applied when a scene changes a
//! device's output level.
//!
//! | Byte | Meaning |
//! |------|---------|
//! | `0x00` | Instant |
//! | `0x01`–`0x7F` | 1–127 seconds |
//! | `0x80`–`0xFE` | 0–126 minutes (`byte - 0x80`) |
//! | `0xFF` | Device factory default |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const MINUTES_BASE: u8 = 0x80;
const FACTORY_DEFAULT: u8 = 0xFF;

/// Encoded dimming duration byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimmingDuration(u8);

impl Default for DimmingDuration {
    /// Three seconds, the duration new scenes start with.
    fn default() -> Self {
        Self(3)
    }
}

impl DimmingDuration {
    /// Change the level immediately.
    #[must_use]
    pub const fn instant() -> Self {
        Self(0)
    }

    /// Let each device use its own default duration.
    #[must_use]
    pub const fn factory_default() -> Self {
        Self(FACTORY_DEFAULT)
    }

    /// Duration in whole seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DurationOutOfRange`] outside `1..=127`.
    pub fn seconds(seconds: u16) -> Result<Self, ValidationError> {
        match u8::try_from(seconds) {
            Ok(s @ 1..=0x7F) => Ok(Self(s)),
            _ => Err(ValidationError::DurationOutOfRange {
                value: seconds,
                unit: "seconds",
            }),
        }
    }

    /// Duration in whole minutes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DurationOutOfRange`] outside `1..=126`.
    pub fn minutes(minutes: u16) -> Result<Self, ValidationError> {
        match u8::try_from(minutes) {
            Ok(m @ 1..=0x7E) => Ok(Self(MINUTES_BASE + m)),
            _ => Err(ValidationError::DurationOutOfRange {
                value: minutes,
                unit: "minutes",
            }),
        }
    }

    /// Raw wire byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl From<u8> for DimmingDuration {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<DimmingDuration> for u8 {
    fn from(value: DimmingDuration) -> Self {
        value.0
    }
}

impl fmt::Display for DimmingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => f.write_str("Instant"),
            s @ 1..=0x7F => write!(f, "{s} seconds"),
            FACTORY_DEFAULT => f.write_str("factory default"),
            m => write!(f, "{} minutes", m - MINUTES_BASE),
        }
    }
}
