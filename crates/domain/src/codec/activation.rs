//! Scene Activation: sent by controllers (and scene-capable devices) when a
//! scene is triggered.

use super::parameters;
use crate::duration::DimmingDuration;
use crate::error::EncodingError;

pub const SET: u8 = 0x01;

/// Decoded SCENE_ACTIVATION SET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneActivation {
    pub scene_id: u8,
    /// Older devices omit the duration byte.
    pub duration: Option<DimmingDuration>,
}

/// Decode an activation payload.
///
/// # Errors
///
/// Returns [`EncodingError`] when the command byte is not SET or the scene
/// id is missing.
pub fn decode_set(payload: &[u8]) -> Result<SceneActivation, EncodingError> {
    let p = parameters("SCENE_ACTIVATION SET", payload, SET, 1)?;
    Ok(SceneActivation {
        scene_id: p[0],
        duration: p.get(1).copied().map(DimmingDuration::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_decode_activation_with_duration() {
        let activation = decode_set(&[0x01, 3, 0]).unwrap();
        assert_eq!(activation.scene_id, 3);
        assert_eq!(activation.duration, Some(DimmingDuration::instant()));
    }

    #[test]
    fn should_decode_activation_without_duration() {
        let activation = decode_set(&[0x01, 3]).unwrap();
        assert_eq!(activation.duration, None);
    }
}
