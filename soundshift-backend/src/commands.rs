//! The command interface and backend notifications

use std::sync::Arc;

use async_trait::async_trait;
use group_store::{AppSettings, AudioDevice, DeviceGroup, DeviceId, GroupDevice, GroupId, NewGroup};
use serde::Serialize;
use soundshift_state::CycleOutcome;

use crate::error::Result;

/// Commands the frontend may issue against the authoritative state
///
/// Every call is independent and carries no session state.
#[async_trait]
pub trait CommandInterface: Send + Sync {
    async fn list_devices(&self) -> Result<Vec<AudioDevice>>;

    async fn set_default_device(&self, id: &DeviceId) -> Result<()>;

    async fn list_groups(&self) -> Result<Vec<DeviceGroup>>;

    async fn create_group(&self, group: NewGroup) -> Result<DeviceGroup>;

    /// Replace a group wholesale, including its active slot
    async fn update_group(&self, group: DeviceGroup) -> Result<DeviceGroup>;

    async fn delete_group(&self, id: &GroupId) -> Result<()>;

    /// Switch a group to its next online device
    async fn cycle_group(&self, id: &GroupId) -> Result<CycleOutcome>;

    /// Switch a group to a specific slot, returning the activated device
    async fn select_group_device(&self, id: &GroupId, index: usize) -> Result<GroupDevice>;

    async fn get_settings(&self) -> Result<AppSettings>;

    async fn update_settings(&self, settings: AppSettings) -> Result<AppSettings>;
}

#[async_trait]
impl<T> CommandInterface for Arc<T>
where
    T: CommandInterface + ?Sized,
{
    async fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        (**self).list_devices().await
    }

    async fn set_default_device(&self, id: &DeviceId) -> Result<()> {
        (**self).set_default_device(id).await
    }

    async fn list_groups(&self) -> Result<Vec<DeviceGroup>> {
        (**self).list_groups().await
    }

    async fn create_group(&self, group: NewGroup) -> Result<DeviceGroup> {
        (**self).create_group(group).await
    }

    async fn update_group(&self, group: DeviceGroup) -> Result<DeviceGroup> {
        (**self).update_group(group).await
    }

    async fn delete_group(&self, id: &GroupId) -> Result<()> {
        (**self).delete_group(id).await
    }

    async fn cycle_group(&self, id: &GroupId) -> Result<CycleOutcome> {
        (**self).cycle_group(id).await
    }

    async fn select_group_device(&self, id: &GroupId, index: usize) -> Result<GroupDevice> {
        (**self).select_group_device(id, index).await
    }

    async fn get_settings(&self) -> Result<AppSettings> {
        (**self).get_settings().await
    }

    async fn update_settings(&self, settings: AppSettings) -> Result<AppSettings> {
        (**self).update_settings(settings).await
    }
}

/// A device switch, for "Switched to ..." notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchEvent {
    pub group_id: GroupId,
    pub device_id: DeviceId,
    /// Name the OS reported at switch time
    pub device_name: String,
}

impl SwitchEvent {
    /// Text for the user-facing notification
    pub fn message(&self) -> String {
        format!("Switched to {}", self.device_name)
    }
}

/// Tags published by the backend when state changed outside a command reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Audio devices were added, removed or renamed
    DevicesChanged,
    /// A group switched its device
    DeviceSwitched(SwitchEvent),
}

impl Notification {
    /// Wire name of the notification
    pub fn tag(&self) -> &'static str {
        match self {
            Notification::DevicesChanged => "devices-changed",
            Notification::DeviceSwitched(_) => "device-switched",
        }
    }
}
