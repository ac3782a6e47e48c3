//! Wire codec for the scene-related command classes.
//!
//! Pure functions on byte slices. Every payload here is the sequence of
//! bytes *following* the command-class id: the first byte is the command,
//! the rest are its parameters, one byte each.
//!
//! Encoders take `u32` numeric fields so out-of-range input from callers is
//! reported as [`EncodingError::FieldOverflow`] instead of being truncated.

pub mod activation;
pub mod actuator_conf;
pub mod association;
pub mod basic;
pub mod configuration;
pub mod controller_conf;
pub mod indicator;
pub mod replication;

use crate::error::EncodingError;

/// Narrow a numeric field to one wire byte.
pub(crate) fn byte(field: &'static str, value: u32) -> Result<u8, EncodingError> {
    u8::try_from(value).map_err(|_| EncodingError::FieldOverflow { field, value })
}

/// Check the command byte and minimum length, returning the parameters.
pub(crate) fn parameters<'a>(
    message: &'static str,
    payload: &'a [u8],
    command: u8,
    min_parameters: usize,
) -> Result<&'a [u8], EncodingError> {
    let (&actual, rest) = payload.split_first().ok_or(EncodingError::Truncated {
        message,
        expected: 1 + min_parameters,
        actual: 0,
    })?;
    if actual != command {
        return Err(EncodingError::UnexpectedCommand {
            message,
            command: actual,
        });
    }
    if rest.len() < min_parameters {
        return Err(EncodingError::Truncated {
            message,
            expected: 1 + min_parameters,
            actual: payload.len(),
        });
    }
    Ok(rest)
}
