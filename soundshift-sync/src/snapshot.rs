//! Snapshots of backend state and the optimistic edits applied to them

use group_store::{AppSettings, AudioDevice, DeviceGroup, GroupId, NewGroup};
use serde::Serialize;
use soundshift_backend::SwitchEvent;
use soundshift_state::{next_index, reconcile, reconcile_all, CycleDecision, ReconciledGroup};

/// Groups, devices and settings as fetched together from the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub groups: Vec<DeviceGroup>,
    pub devices: Vec<AudioDevice>,
    pub settings: AppSettings,
}

impl Snapshot {
    pub fn group(&self, id: &GroupId) -> Option<&DeviceGroup> {
        self.groups.iter().find(|g| &g.id == id)
    }

    pub fn reconciled(&self) -> Vec<ReconciledGroup> {
        reconcile_all(&self.devices, &self.groups)
    }

    // ========================================================================
    // Optimistic edits
    //
    // Each returns the state the backend is expected to reach. They never
    // fail; a command the backend rejects is rolled back instead.
    // ========================================================================

    /// Append a provisional group; its id is replaced on the next refresh
    pub fn with_created(&self, new: &NewGroup) -> Self {
        let mut next = self.clone();
        next.groups.push(DeviceGroup {
            id: GroupId::generate(),
            name: new.name.trim().to_string(),
            devices: new.devices.clone(),
            shortcut: new.shortcut.clone(),
            current_index: 0,
        });
        next
    }

    pub fn with_updated(&self, group: &DeviceGroup) -> Self {
        let mut next = self.clone();
        if let Some(existing) = next.groups.iter_mut().find(|g| g.id == group.id) {
            *existing = group.clone();
            existing.name = group.name.trim().to_string();
        }
        next
    }

    pub fn with_deleted(&self, id: &GroupId) -> Self {
        let mut next = self.clone();
        next.groups.retain(|g| &g.id != id);
        next
    }

    /// Advance a group as the cycle engine would, given the devices we know
    pub fn with_cycled(&self, id: &GroupId) -> Self {
        let target = self.group(id).and_then(|group| {
            match next_index(group.current_index, &reconcile(&self.devices, group)) {
                CycleDecision::Activate(index) => Some(index),
                CycleDecision::NoOnlineDevices => None,
            }
        });

        match target {
            Some(index) => self.with_selected(id, index),
            None => self.clone(),
        }
    }

    /// Activate a slot and mark its device as the system default
    pub fn with_selected(&self, id: &GroupId, index: usize) -> Self {
        let mut next = self.clone();
        let device_id = next.groups.iter_mut().find(|g| &g.id == id).and_then(|group| {
            let device_id = group.devices.get(index)?.id.clone();
            group.current_index = index;
            Some(device_id)
        });

        if let Some(device_id) = device_id {
            if next.devices.iter().any(|d| d.id == device_id) {
                for device in next.devices.iter_mut() {
                    device.is_default = device.id == device_id;
                }
            }
        }
        next
    }

    pub fn with_settings(&self, settings: AppSettings) -> Self {
        Self {
            settings,
            ..self.clone()
        }
    }
}

/// What a frontend renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncView {
    pub groups: Vec<ReconciledGroup>,
    pub devices: Vec<AudioDevice>,
    pub settings: AppSettings,
    /// At least one fetch has been applied
    pub loaded: bool,
    /// An optimistic edit is awaiting confirmation
    pub pending: bool,
    /// User-visible text of the most recent failure
    pub last_error: Option<String>,
    pub last_switch: Option<SwitchEvent>,
}
