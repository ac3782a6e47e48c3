//! Association: fans a controller group's commands out to a node list.
//! Only the frames used while programming scenes are encoded.

use super::byte;
use crate::error::EncodingError;
use crate::id::DeviceId;

pub const SET: u8 = 0x01;
pub const REMOVE: u8 = 0x04;

/// Encode a SET adding `devices` to association group `group_id`.
///
/// # Errors
///
/// Returns [`EncodingError::FieldOverflow`] if `group_id` exceeds one byte.
pub fn encode_set(group_id: u32, devices: &[DeviceId]) -> Result<Vec<u8>, EncodingError> {
    let mut payload = Vec::with_capacity(2 + devices.len());
    payload.push(SET);
    payload.push(byte("group id", group_id)?);
    payload.extend(devices.iter().map(|d| d.as_u8()));
    Ok(payload)
}

/// Encode a REMOVE with an empty node list, clearing the whole group.
///
/// # Errors
///
/// Returns [`EncodingError::FieldOverflow`] if `group_id` exceeds one byte.
pub fn encode_remove_all(group_id: u32) -> Result<Vec<u8>, EncodingError> {
    Ok(vec![REMOVE, byte("group id", group_id)?])
}
