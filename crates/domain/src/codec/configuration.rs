//! Configuration: sets a one-byte device parameter. Scene controllers use
//! the parameter numbered after a group to remember the level sent to
//! non-scene-capable devices in that group.

use super::byte;
use crate::error::EncodingError;

pub const SET: u8 = 0x04;

/// Encode a SET of a one-byte parameter.
///
/// # Errors
///
/// Returns [`EncodingError::FieldOverflow`] if a numeric field exceeds one byte.
pub fn encode_set(parameter: u32, value: u32) -> Result<Vec<u8>, EncodingError> {
    Ok(vec![
        SET,
        byte("parameter", parameter)?,
        1,
        byte("value", value)?,
    ])
}
