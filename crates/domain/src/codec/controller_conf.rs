//! Scene Controller Configuration: binds a controller's button (group)
//! to a scene id.
//!
//! | Command | Layout |
//! |---------|--------|
//! | SET `0x01` | group id, scene id, dimming duration |
//! | GET `0x02` | group id |
//! | REPORT `0x03` | group id, scene id, dimming duration |

use super::{byte, parameters};
use crate::duration::DimmingDuration;
use crate::error::EncodingError;

pub const SET: u8 = 0x01;
pub const GET: u8 = 0x02;
pub const REPORT: u8 = 0x03;

/// Decoded SCENE_CONTROLLER_CONF REPORT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfReport {
    pub group_id: u8,
    pub scene_id: u8,
    pub duration: DimmingDuration,
}

/// Encode a SET binding `group_id` to `scene_id`.
///
/// # Errors
///
/// Returns [`EncodingError::FieldOverflow`] if a numeric field exceeds one byte.
pub fn encode_set(group_id: u32, scene_id: u32, duration: u32) -> Result<Vec<u8>, EncodingError> {
    Ok(vec![
        SET,
        byte("group id", group_id)?,
        byte("scene id", scene_id)?,
        byte("dimming duration", duration)?,
    ])
}

/// Encode a GET for the scene bound to `group_id`.
///
/// # Errors
///
/// Returns [`EncodingError::FieldOverflow`] if `group_id` exceeds one byte.
pub fn encode_get(group_id: u32) -> Result<Vec<u8>, EncodingError> {
    Ok(vec![GET, byte("group id", group_id)?])
}

/// Decode a REPORT payload.
///
/// # Errors
///
/// Returns [`EncodingError`] when the command byte is not REPORT or the
/// payload is shorter than 4 bytes.
pub fn decode_report(payload: &[u8]) -> Result<ControllerConfReport, EncodingError> {
    let p = parameters("SCENE_CONTROLLER_CONF REPORT", payload, REPORT, 3)?;
    Ok(ControllerConfReport {
        group_id: p[0],
        scene_id: p[1],
        duration: DimmingDuration::from(p[2]),
    })
}
