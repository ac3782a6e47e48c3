//! Controller Replication: inbound transfers from a primary controller
//! copying its group and scene tables. Only decoding is needed.
//!
//! Every variant starts with a sequence number after the command byte.

use super::parameters;
use crate::error::EncodingError;

pub const TRANSFER_GROUP: u8 = 0x31;
pub const TRANSFER_GROUP_NAME: u8 = 0x32;
pub const TRANSFER_SCENE: u8 = 0x33;
pub const TRANSFER_SCENE_NAME: u8 = 0x34;

/// One decoded replication transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicationReport {
    /// `device_id` is a member of association group `group_id`.
    TransferGroup {
        sequence: u8,
        group_id: u8,
        device_id: u8,
    },
    /// Human-readable name of a group.
    TransferGroupName {
        sequence: u8,
        group_id: u8,
        name: Vec<u8>,
    },
    /// `device_id` goes to `level` when `scene_id` is activated.
    TransferScene {
        sequence: u8,
        scene_id: u8,
        device_id: u8,
        level: u8,
    },
    /// Human-readable name of a scene.
    TransferSceneName {
        sequence: u8,
        scene_id: u8,
        name: Vec<u8>,
    },
}

impl ReplicationReport {
    /// Name carried by the name transfers, decoded lossily as UTF-8.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        match self {
            Self::TransferGroupName { name, .. } | Self::TransferSceneName { name, .. } => {
                Some(String::from_utf8_lossy(name).into_owned())
            }
            Self::TransferGroup { .. } | Self::TransferScene { .. } => None,
        }
    }
}

/// Decode a replication payload.
///
/// # Errors
///
/// Returns [`EncodingError::UnexpectedCommand`] for unknown commands and
/// [`EncodingError::Truncated`] when the payload is too short for its variant.
pub fn decode(payload: &[u8]) -> Result<ReplicationReport, EncodingError> {
    let command = payload.first().copied().ok_or(EncodingError::Truncated {
        message: "CONTROLLER_REPLICATION",
        expected: 1,
        actual: 0,
    })?;
    match command {
        TRANSFER_GROUP => {
            let p = parameters("TRANSFER_GROUP", payload, command, 3)?;
            Ok(ReplicationReport::TransferGroup {
                sequence: p[0],
                group_id: p[1],
                device_id: p[2],
            })
        }
        TRANSFER_GROUP_NAME => {
            let p = parameters("TRANSFER_GROUP_NAME", payload, command, 2)?;
            Ok(ReplicationReport::TransferGroupName {
                sequence: p[0],
                group_id: p[1],
                name: p[2..].to_vec(),
            })
        }
        TRANSFER_SCENE => {
            let p = parameters("TRANSFER_SCENE", payload, command, 4)?;
            Ok(ReplicationReport::TransferScene {
                sequence: p[0],
                scene_id: p[1],
                device_id: p[2],
                level: p[3],
            })
        }
        TRANSFER_SCENE_NAME => {
            let p = parameters("TRANSFER_SCENE_NAME", payload, command, 2)?;
            Ok(ReplicationReport::TransferSceneName {
                sequence: p[0],
                scene_id: p[1],
                name: p[2..].to_vec(),
            })
        }
        other => Err(EncodingError::UnexpectedCommand {
            message: "CONTROLLER_REPLICATION",
            command: other,
        }),
    }
}
