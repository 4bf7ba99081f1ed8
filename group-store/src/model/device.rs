//! Audio device types

use super::DeviceId;
use serde::{Deserialize, Serialize};

/// A live audio output endpoint reported by the OS
///
/// Transient: re-queried on every refresh and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDevice {
    pub id: DeviceId,
    /// Friendly name as currently reported by the OS
    pub name: String,
    /// Whether this is the system default output
    pub is_default: bool,
}

impl AudioDevice {
    pub fn new(id: impl Into<DeviceId>, name: impl Into<String>, is_default: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_default,
        }
    }
}

/// A persisted reference to a device inside a group
///
/// Keeps the last-known name so an unplugged device can still be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDevice {
    pub id: DeviceId,
    pub name: String,
}

impl GroupDevice {
    pub fn new(id: impl Into<DeviceId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl From<&AudioDevice> for GroupDevice {
    fn from(device: &AudioDevice) -> Self {
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
        }
    }
}
