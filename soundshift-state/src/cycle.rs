//! Cycle engine
//!
//! [`next_index`] and [`check_selection`] decide which slot to activate
//! from reconciled slots alone. [`cycle`] and [`select`] carry the decision
//! out: the OS default device is switched first and the group's
//! `current_index` is written only once that call has succeeded.

use group_store::{DeviceGroup, GroupDevice};
use serde::Serialize;
use tracing::{debug, info};

use crate::endpoints::AudioEndpoints;
use crate::error::{Result, SelectionError};
use crate::reconcile::{online_indices, reconcile, SlotStatus};

/// What a cycle should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDecision {
    /// Activate this slot index
    Activate(usize),
    /// Nothing in the group is connected
    NoOnlineDevices,
}

/// Result of a completed cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// The default device was switched. `device.name` is the name the OS
    /// reported at switch time.
    Switched { index: usize, device: GroupDevice },
    NoOnlineDevices,
}

/// Next slot to activate when cycling
///
/// Walks the online slots in stored order, starting after `current_index`
/// and wrapping around. If the current slot is offline the first online
/// slot is chosen.
pub fn next_index(current_index: usize, slots: &[SlotStatus]) -> CycleDecision {
    let online = online_indices(slots);

    match online.len() {
        0 => CycleDecision::NoOnlineDevices,
        1 => CycleDecision::Activate(online[0]),
        len => {
            let next = match online.iter().position(|&i| i == current_index) {
                Some(pos) => (pos + 1) % len,
                None => 0,
            };
            CycleDecision::Activate(online[next])
        }
    }
}

/// Check that `target` names an existing, online slot
pub fn check_selection(slots: &[SlotStatus], target: usize) -> std::result::Result<&SlotStatus, SelectionError> {
    let slot = slots.get(target).ok_or(SelectionError::OutOfRange {
        index: target,
        len: slots.len(),
    })?;

    if !slot.online {
        return Err(SelectionError::Offline {
            index: target,
            name: slot.slot.name.clone(),
        });
    }
    Ok(slot)
}

/// Advance a group to its next online device
///
/// On any failure `group` is left unchanged.
pub async fn cycle<E>(endpoints: &E, group: &mut DeviceGroup) -> Result<CycleOutcome>
where
    E: AudioEndpoints + ?Sized,
{
    let live = endpoints.list_devices().await?;
    let slots = reconcile(&live, group);

    let index = match next_index(group.current_index, &slots) {
        CycleDecision::Activate(index) => index,
        CycleDecision::NoOnlineDevices => {
            info!("Group '{}' has no online devices, nothing to cycle", group.name);
            return Ok(CycleOutcome::NoOnlineDevices);
        }
    };

    let device = activate(endpoints, group, &slots[index]).await?;
    Ok(CycleOutcome::Switched { index, device })
}

/// Activate a specific slot of a group
///
/// Fails without contacting the OS when the slot is out of range or
/// offline. On any failure `group` is left unchanged.
pub async fn select<E>(endpoints: &E, group: &mut DeviceGroup, index: usize) -> Result<GroupDevice>
where
    E: AudioEndpoints + ?Sized,
{
    let live = endpoints.list_devices().await?;
    let slots = reconcile(&live, group);
    let slot = check_selection(&slots, index)?;

    activate(endpoints, group, slot).await
}

async fn activate<E>(endpoints: &E, group: &mut DeviceGroup, slot: &SlotStatus) -> Result<GroupDevice>
where
    E: AudioEndpoints + ?Sized,
{
    endpoints.set_default_device(&slot.slot.id).await?;

    debug!(
        "Group '{}' slot {} -> {}",
        group.name, group.current_index, slot.index
    );
    group.current_index = slot.index;

    Ok(GroupDevice::new(slot.slot.id.clone(), slot.display_name()))
}
