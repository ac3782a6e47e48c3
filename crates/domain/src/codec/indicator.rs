//! Indicator: one bit per controller button LED, bit 0 = button 1.

use super::{byte, parameters};
use crate::error::EncodingError;

pub const SET: u8 = 0x01;
pub const GET: u8 = 0x02;
pub const REPORT: u8 = 0x03;

/// Encode a SET replacing the whole indicator bitmask.
///
/// # Errors
///
/// Returns [`EncodingError::FieldOverflow`] if `bitmask` exceeds one byte.
pub fn encode_set(bitmask: u32) -> Result<Vec<u8>, EncodingError> {
    Ok(vec![SET, byte("indicator", bitmask)?])
}

/// Encode a GET for the current indicator bitmask.
#[must_use]
pub fn encode_get() -> Vec<u8> {
    vec![GET]
}

/// Decode a REPORT payload into the reported bitmask.
///
/// # Errors
///
/// Returns [`EncodingError`] when the command byte is not REPORT or the
/// value byte is missing.
pub fn decode_report(payload: &[u8]) -> Result<u8, EncodingError> {
    let p = parameters("INDICATOR REPORT", payload, REPORT, 1)?;
    Ok(p[0])
}
