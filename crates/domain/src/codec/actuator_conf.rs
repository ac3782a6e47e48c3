//! Scene Actuator Configuration: stores a scene's level and duration
//! directly inside a scene-capable device.
//!
//! | Command | Layout |
//! |---------|--------|
//! | SET `0x01` | scene id, dimming duration, override (bit 7), level |
//! | GET `0x02` | scene id |
//! | REPORT `0x03` | scene id, level, dimming duration |

use super::{byte, parameters};
use crate::duration::DimmingDuration;
use crate::error::EncodingError;

pub const SET: u8 = 0x01;
pub const GET: u8 = 0x02;
pub const REPORT: u8 = 0x03;

/// Bit 7 of the level-2 byte: apply the given level instead of the
/// device's current output.
const OVERRIDE_BIT: u8 = 0x80;

/// Decoded SCENE_ACTUATOR_CONF REPORT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorConfReport {
    pub scene_id: u8,
    pub level: u8,
    pub duration: DimmingDuration,
}

/// Encode a SET storing `level` for `scene_id` in the receiving device.
///
/// # Errors
///
/// Returns [`EncodingError::FieldOverflow`] if a numeric field exceeds one byte.
pub fn encode_set(
    scene_id: u32,
    level: u32,
    duration: u32,
    override_level: bool,
) -> Result<Vec<u8>, EncodingError> {
    let flags = if override_level { OVERRIDE_BIT } else { 0 };
    Ok(vec![
        SET,
        byte("scene id", scene_id)?,
        byte("dimming duration", duration)?,
        flags,
        byte("level", level)?,
    ])
}

/// Encode a GET for the configuration of `scene_id`.
///
/// # Errors
///
/// Returns [`EncodingError::FieldOverflow`] if `scene_id` exceeds one byte.
pub fn encode_get(scene_id: u32) -> Result<Vec<u8>, EncodingError> {
    Ok(vec![GET, byte("scene id", scene_id)?])
}

/// Decode a REPORT payload.
///
/// # Errors
///
/// Returns [`EncodingError`] when the command byte is not REPORT or the
/// payload is shorter than 4 bytes.
pub fn decode_report(payload: &[u8]) -> Result<ActuatorConfReport, EncodingError> {
    let p = parameters("SCENE_ACTUATOR_CONF REPORT", payload, REPORT, 3)?;
    Ok(ActuatorConfReport {
        scene_id: p[0],
        level: p[1],
        duration: DimmingDuration::from(p[2]),
    })
}
