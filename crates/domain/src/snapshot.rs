//! Snapshot — the persistable description of every scene.
//!
//! Only configuration is captured (names, durations, members). Runtime state
//! such as indicator caches is rebuilt from the network after a restore.

use serde::{Deserialize, Serialize};

use crate::duration::DimmingDuration;
use crate::id::{ButtonId, DeviceId, SceneId};
use crate::time::Timestamp;

/// All scenes known to a scene manager.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub saved_at: Option<Timestamp>,
    pub scenes: Vec<SceneRecord>,
}

/// One scene's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub id: SceneId,
    pub name: String,
    #[serde(default)]
    pub duration: DimmingDuration,
    #[serde(default = "default_override")]
    pub override_level: bool,
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
    #[serde(default)]
    pub controllers: Vec<ControllerRecord>,
}

/// A device member and its target level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub device_id: DeviceId,
    pub value: u8,
}

/// A controller button bound to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerRecord {
    pub device_id: DeviceId,
    pub button: ButtonId,
}

fn default_override() -> bool {
    true
}

impl SceneSnapshot {
    /// Whether the snapshot holds no scenes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}
