//! DeviceGroup and its create/update payloads

use super::{DeviceId, GroupDevice, GroupId};
use serde::{Deserialize, Serialize};
use shortcut_codec::Shortcut;

/// A named, ordered set of device references with one active slot
///
/// Invariants (upheld by [`GroupStore`](crate::GroupStore)):
/// - `devices` is non-empty and has no repeated device id
/// - `current_index < devices.len()`
///
/// The order of `devices` is the cycle order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceGroup {
    pub id: GroupId,
    pub name: String,
    pub devices: Vec<GroupDevice>,
    pub shortcut: Option<Shortcut>,
    pub current_index: usize,
}

impl DeviceGroup {
    /// Number of device slots
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// The device in the active slot
    pub fn current_device(&self) -> Option<&GroupDevice> {
        self.devices.get(self.current_index)
    }

    /// Slot index of a device, if it is a member
    pub fn position_of(&self, device_id: &DeviceId) -> Option<usize> {
        self.devices.iter().position(|d| &d.id == device_id)
    }

    pub fn contains_device(&self, device_id: &DeviceId) -> bool {
        self.position_of(device_id).is_some()
    }
}

/// Payload for creating a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub devices: Vec<GroupDevice>,
    pub shortcut: Option<Shortcut>,
}

impl NewGroup {
    pub fn new(name: impl Into<String>, devices: Vec<GroupDevice>) -> Self {
        Self {
            name: name.into(),
            devices,
            shortcut: None,
        }
    }

    pub fn with_shortcut(mut self, shortcut: Shortcut) -> Self {
        self.shortcut = Some(shortcut);
        self
    }
}

/// Payload for editing a group
///
/// `current_index: None` keeps the stored active slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUpdate {
    pub id: GroupId,
    pub name: String,
    pub devices: Vec<GroupDevice>,
    pub shortcut: Option<Shortcut>,
    #[serde(default)]
    pub current_index: Option<usize>,
}

impl From<DeviceGroup> for GroupUpdate {
    fn from(group: DeviceGroup) -> Self {
        Self {
            id: group.id,
            name: group.name,
            devices: group.devices,
            shortcut: group.shortcut,
            current_index: Some(group.current_index),
        }
    }
}
