//! Device reconciliation
//!
//! Matches a group's persisted device slots against the live device list by
//! id. The result is a derived view; persisted names are never touched.

use group_store::{AudioDevice, DeviceGroup, GroupDevice};
use serde::Serialize;

/// Live status of one slot in a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    pub index: usize,
    pub slot: GroupDevice,
    pub online: bool,
    /// The matching live device, when online
    pub live: Option<AudioDevice>,
}

impl SlotStatus {
    /// Live name when online, last-known name otherwise
    pub fn display_name(&self) -> &str {
        match &self.live {
            Some(device) => &device.name,
            None => &self.slot.name,
        }
    }

    /// True iff the slot is online and is the system default output
    pub fn is_default(&self) -> bool {
        self.live.as_ref().is_some_and(|d| d.is_default)
    }
}

/// Per-slot status for every device in a group
pub fn reconcile(live: &[AudioDevice], group: &DeviceGroup) -> Vec<SlotStatus> {
    group
        .devices
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let live = live.iter().find(|d| d.id == slot.id).cloned();
            SlotStatus {
                index,
                slot: slot.clone(),
                online: live.is_some(),
                live,
            }
        })
        .collect()
}

/// Indices of online slots, in stored order
pub fn online_indices(slots: &[SlotStatus]) -> Vec<usize> {
    slots.iter().filter(|s| s.online).map(|s| s.index).collect()
}

/// A group together with its reconciled slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledGroup {
    pub group: DeviceGroup,
    pub slots: Vec<SlotStatus>,
}

impl ReconciledGroup {
    pub fn new(live: &[AudioDevice], group: DeviceGroup) -> Self {
        let slots = reconcile(live, &group);
        Self { group, slots }
    }

    /// Number of slots currently online (the `x` in "x/y online")
    pub fn online_count(&self) -> usize {
        self.slots.iter().filter(|s| s.online).count()
    }

    pub fn online_indices(&self) -> Vec<usize> {
        online_indices(&self.slots)
    }

    /// The active slot, if it is online
    pub fn active_slot(&self) -> Option<&SlotStatus> {
        self.slots.get(self.group.current_index).filter(|s| s.online)
    }
}

/// Reconcile every group against the same live device list
pub fn reconcile_all(live: &[AudioDevice], groups: &[DeviceGroup]) -> Vec<ReconciledGroup> {
    groups.iter().cloned().map(|g| ReconciledGroup::new(live, g)).collect()
}
