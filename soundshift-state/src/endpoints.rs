//! Boundary to the OS audio subsystem
//!
//! [`AudioEndpoints`] is the only way the core talks to the platform audio
//! stack. [`MemoryEndpoints`] implements it in memory for demo mode and
//! tests.

use async_trait::async_trait;
use group_store::{AudioDevice, DeviceId};
use parking_lot::Mutex;
use tracing::debug;

use crate::error::EndpointError;

/// Enumerates output devices and switches the system default
#[async_trait]
pub trait AudioEndpoints: Send + Sync {
    /// Currently connected output devices
    async fn list_devices(&self) -> Result<Vec<AudioDevice>, EndpointError>;

    /// Make `id` the system default output
    async fn set_default_device(&self, id: &DeviceId) -> Result<(), EndpointError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    devices: Vec<AudioDevice>,
    fail_next_switch: Option<String>,
    fail_next_list: Option<String>,
    switches: Vec<DeviceId>,
}

/// In-memory audio endpoints
///
/// Devices can be plugged, unplugged and renamed at runtime, and the next
/// call can be made to fail, which is enough to drive every reconciliation
/// and cycling path without real hardware.
///
/// # Example
///
/// ```rust,ignore
/// let endpoints = MemoryEndpoints::demo();
/// endpoints.unplug(&DeviceId::new("dev-3"));
/// endpoints.fail_next("driver crashed");
///
/// assert!(endpoints.set_default_device(&DeviceId::new("dev-2")).await.is_err());
/// assert!(endpoints.set_default_device(&DeviceId::new("dev-2")).await.is_ok());
/// ```
#[derive(Debug, Default)]
pub struct MemoryEndpoints {
    state: Mutex<MemoryState>,
}

impl MemoryEndpoints {
    pub fn new(devices: Vec<AudioDevice>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                devices,
                ..Default::default()
            }),
        }
    }

    /// Endpoints seeded with a typical desktop setup
    pub fn demo() -> Self {
        Self::new(vec![
            AudioDevice::new("dev-1", "Speakers (Realtek High Definition Audio)", true),
            AudioDevice::new("dev-2", "Headphones (HyperX Cloud II Wireless)", false),
            AudioDevice::new("dev-3", "NVIDIA RTX Voice", false),
            AudioDevice::new("dev-4", "Focusrite Scarlett 2i2 USB", false),
            AudioDevice::new("dev-5", "LG TV (HDMI)", false),
        ])
    }

    /// Connect a device, replacing any device with the same id
    pub fn plug(&self, device: AudioDevice) {
        let mut state = self.state.lock();
        if device.is_default {
            for d in state.devices.iter_mut() {
                d.is_default = false;
            }
        }
        match state.devices.iter_mut().find(|d| d.id == device.id) {
            Some(existing) => *existing = device,
            None => state.devices.push(device),
        }
    }

    /// Disconnect a device; returns whether it was connected
    pub fn unplug(&self, id: &DeviceId) -> bool {
        let mut state = self.state.lock();
        let before = state.devices.len();
        state.devices.retain(|d| &d.id != id);
        state.devices.len() != before
    }

    /// Change the OS-reported name of a connected device
    pub fn rename(&self, id: &DeviceId, name: impl Into<String>) -> bool {
        let mut state = self.state.lock();
        match state.devices.iter_mut().find(|d| &d.id == id) {
            Some(device) => {
                device.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Make the next `set_default_device` call fail with `message`
    pub fn fail_next(&self, message: impl Into<String>) {
        self.state.lock().fail_next_switch = Some(message.into());
    }

    /// Make the next `list_devices` call fail with `message`
    pub fn fail_next_list(&self, message: impl Into<String>) {
        self.state.lock().fail_next_list = Some(message.into());
    }

    /// Snapshot of the connected devices
    pub fn devices(&self) -> Vec<AudioDevice> {
        self.state.lock().devices.clone()
    }

    /// Every device id passed to a successful `set_default_device`, in order
    pub fn switches(&self) -> Vec<DeviceId> {
        self.state.lock().switches.clone()
    }

    pub fn default_device(&self) -> Option<AudioDevice> {
        self.state.lock().devices.iter().find(|d| d.is_default).cloned()
    }
}

#[async_trait]
impl AudioEndpoints for MemoryEndpoints {
    async fn list_devices(&self) -> Result<Vec<AudioDevice>, EndpointError> {
        let mut state = self.state.lock();
        if let Some(message) = state.fail_next_list.take() {
            return Err(EndpointError::Failed(message));
        }
        Ok(state.devices.clone())
    }

    async fn set_default_device(&self, id: &DeviceId) -> Result<(), EndpointError> {
        let mut state = self.state.lock();
        if let Some(message) = state.fail_next_switch.take() {
            return Err(EndpointError::Failed(message));
        }
        if !state.devices.iter().any(|d| &d.id == id) {
            return Err(EndpointError::DeviceNotFound(id.clone()));
        }

        for device in state.devices.iter_mut() {
            device.is_default = &device.id == id;
        }
        state.switches.push(id.clone());
        debug!("Default output device -> {}", id);
        Ok(())
    }
}
