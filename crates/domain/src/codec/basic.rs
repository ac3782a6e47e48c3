//! Basic: what a scene controller emits when a button is pressed. The
//! value says on/off but not which button.

use super::parameters;
use crate::error::EncodingError;

pub const SET: u8 = 0x01;
pub const REPORT: u8 = 0x03;

/// Decode a Basic SET or REPORT into its value byte.
///
/// # Errors
///
/// Returns [`EncodingError`] for other commands or a missing value.
pub fn decode(payload: &[u8]) -> Result<u8, EncodingError> {
    let command = match payload.first() {
        Some(&SET) => SET,
        _ => REPORT,
    };
    let p = parameters("BASIC", payload, command, 1)?;
    Ok(p[0])
}
