//! SoundShift - Main entry point for the SDK
//!
//! Wires the authoritative backend to a sync controller running on its own
//! thread, and exposes both through a blocking API.

use std::sync::Arc;
use std::time::Duration;

use group_store::{
    AppSettings, DeviceGroup, GroupDevice, GroupId, GroupStore, NewGroup, StoreFile,
};
use shortcut_codec::Shortcut;
use soundshift_backend::{LocalBackend, MemoryRegistrar, ShortcutRegistrar};
use soundshift_state::logging::{self, LoggingMode};
use soundshift_state::{AudioEndpoints, CycleOutcome, MemoryEndpoints};
use soundshift_sync::{RefreshOutcome, SyncConfig, SyncHandle, SyncView};
use tokio::runtime::Runtime;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::{Result, SdkError};

/// Main system entry point
///
/// SoundShift is fully synchronous - no async/await required.
///
/// # Example
///
/// ```rust,ignore
/// use soundshift_sdk::SoundShift;
///
/// fn main() -> Result<(), soundshift_sdk::SdkError> {
///     let system = SoundShift::demo()?;
///     system.wait_until_loaded(std::time::Duration::from_secs(1));
///
///     for group in system.view().groups {
///         println!("{} ({}/{} online)", group.group.name, group.online_count(), group.slots.len());
///     }
///
///     // What the global shortcut hook calls
///     system.press_shortcut(&"Ctrl+Alt+G".parse()?)?;
///     Ok(())
/// }
/// ```
pub struct SoundShift {
    /// Authoritative state, shared with OS-side callers
    backend: Arc<LocalBackend>,

    /// Frontend mirror running on its own worker thread
    sync: SyncHandle,

    /// Drives backend entry points invoked from OS callbacks
    runtime: Runtime,
}

impl SoundShift {
    pub fn builder() -> SoundShiftBuilder {
        SoundShiftBuilder::new()
    }

    /// In-memory system seeded with sample devices and groups
    pub fn demo() -> Result<Self> {
        SoundShiftBuilder::new()
            .with_endpoints(Arc::new(MemoryEndpoints::demo()))
            .with_store(demo_store()?)
            .build()
    }

    // ========================================================================
    // Frontend view
    // ========================================================================

    pub fn view(&self) -> SyncView {
        self.sync.view()
    }

    /// Receiver notified on every published view
    pub fn subscribe(&self) -> watch::Receiver<SyncView> {
        self.sync.subscribe()
    }

    /// Block until the first fetch has landed. Returns false on timeout.
    pub fn wait_until_loaded(&self, timeout: Duration) -> bool {
        self.sync.wait_until_loaded(timeout)
    }

    pub fn refresh(&self) -> Result<RefreshOutcome> {
        Ok(self.sync.refresh()?)
    }

    pub fn clear_error(&self) {
        self.sync.clear_error();
    }

    // ========================================================================
    // User actions
    // ========================================================================

    pub fn create_group(&self, new: NewGroup) -> Result<DeviceGroup> {
        Ok(self.sync.create_group(new)?)
    }

    pub fn update_group(&self, group: DeviceGroup) -> Result<DeviceGroup> {
        Ok(self.sync.update_group(group)?)
    }

    pub fn delete_group(&self, id: &GroupId) -> Result<()> {
        Ok(self.sync.delete_group(id)?)
    }

    pub fn cycle_group(&self, id: &GroupId) -> Result<CycleOutcome> {
        Ok(self.sync.cycle_group(id)?)
    }

    pub fn select_device(&self, id: &GroupId, index: usize) -> Result<GroupDevice> {
        Ok(self.sync.select_device(id, index)?)
    }

    pub fn update_settings(&self, settings: AppSettings) -> Result<AppSettings> {
        Ok(self.sync.update_settings(settings)?)
    }

    // ========================================================================
    // OS-side entry points
    // ========================================================================

    /// A registered global shortcut was pressed
    ///
    /// Returns `None` when no group is bound to it. The view catches up
    /// through the switch notification.
    pub fn press_shortcut(&self, shortcut: &Shortcut) -> Result<Option<CycleOutcome>> {
        Ok(self.runtime.block_on(self.backend.handle_shortcut(shortcut))?)
    }

    /// The OS reported a device being added, removed or renamed
    pub fn devices_changed(&self) {
        self.backend.notify_devices_changed();
    }

    pub fn backend(&self) -> &Arc<LocalBackend> {
        &self.backend
    }

    /// Shutdown the background worker
    pub fn shutdown(&self) {
        info!("SoundShift shutting down");
        self.sync.shutdown();
    }
}

/// Builder for [`SoundShift`]
///
/// Endpoints are required. The registrar defaults to an in-memory one,
/// nothing is persisted unless a store file is given, and no log subscriber
/// is installed unless a logging mode is given.
pub struct SoundShiftBuilder {
    endpoints: Option<Arc<dyn AudioEndpoints>>,
    registrar: Option<Arc<dyn ShortcutRegistrar>>,
    store_file: Option<StoreFile>,
    store: Option<GroupStore>,
    config: SyncConfig,
    logging: Option<LoggingMode>,
}

impl SoundShiftBuilder {
    pub fn new() -> Self {
        Self {
            endpoints: None,
            registrar: None,
            store_file: None,
            store: None,
            config: SyncConfig::default(),
            logging: None,
        }
    }

    pub fn with_endpoints(mut self, endpoints: Arc<dyn AudioEndpoints>) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    pub fn with_registrar(mut self, registrar: Arc<dyn ShortcutRegistrar>) -> Self {
        self.registrar = Some(registrar);
        self
    }

    /// Load from and save to `file`
    pub fn with_store_file(mut self, file: StoreFile) -> Self {
        self.store_file = Some(file);
        self
    }

    /// Persist to `<config_dir>/soundshift/config.json`
    pub fn with_default_store_file(self) -> Result<Self> {
        Ok(self.with_store_file(StoreFile::default_location()?))
    }

    /// Start from an in-memory store. Ignored when a store file is set.
    pub fn with_store(mut self, store: GroupStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Install a global log subscriber on build
    pub fn with_logging(mut self, mode: LoggingMode) -> Self {
        self.logging = Some(mode);
        self
    }

    /// Install a global log subscriber on build, mode from `SOUNDSHIFT_LOG_MODE`
    pub fn with_logging_from_env(mut self) -> Self {
        self.logging = std::env::var("SOUNDSHIFT_LOG_MODE")
            .ok()
            .map(|value| LoggingMode::from_env_value(&value));
        self
    }

    pub fn build(self) -> Result<SoundShift> {
        let endpoints = self.endpoints.ok_or(SdkError::MissingEndpoints)?;
        if let Some(mode) = self.logging {
            // An existing global subscriber is kept
            if let Err(e) = logging::init_logging(mode) {
                warn!("Logging not configured: {}", e);
            }
        }
        let registrar: Arc<dyn ShortcutRegistrar> = match self.registrar {
            Some(registrar) => registrar,
            None => Arc::new(MemoryRegistrar::new()),
        };

        let backend = match self.store_file {
            Some(file) => LocalBackend::open(endpoints, registrar, Some(file))?,
            None => LocalBackend::with_store(self.store.unwrap_or_default(), endpoints, registrar),
        };
        let backend = Arc::new(backend);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SdkError::Runtime)?;

        let notifications = backend.subscribe(self.config.notification_buffer);
        let sync = SyncHandle::spawn(backend.clone(), notifications, self.config)?;

        Ok(SoundShift {
            backend,
            sync,
            runtime,
        })
    }
}

impl Default for SoundShiftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Groups matching [`MemoryEndpoints::demo`]
pub fn demo_store() -> Result<GroupStore> {
    let mut store = GroupStore::new();
    let groups = [
        ("Gaming", [("dev-2", "Headphones"), ("dev-1", "Speakers")], "Ctrl+Alt+G"),
        ("Music Production", [("dev-4", "Focusrite"), ("dev-2", "Headphones")], "Ctrl+Alt+M"),
        ("Movies", [("dev-5", "LG TV"), ("dev-1", "Speakers")], "Ctrl+Alt+V"),
    ];

    for (name, devices, shortcut) in groups {
        let devices = devices
            .into_iter()
            .map(|(id, name)| GroupDevice::new(id, name))
            .collect();
        store.create(NewGroup::new(name, devices).with_shortcut(Shortcut::parse(shortcut)?))?;
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_endpoints() {
        let err = SoundShift::builder().build().err().unwrap();
        assert!(matches!(err, SdkError::MissingEndpoints));
    }

    #[test]
    fn test_build_with_logging_tolerates_existing_subscriber() {
        let build = || {
            SoundShift::builder()
                .with_endpoints(Arc::new(MemoryEndpoints::demo()))
                .with_logging(LoggingMode::Development)
                .build()
        };

        build().unwrap().shutdown();
        build().unwrap().shutdown();
    }

    #[test]
    fn test_demo_store() {
        let store = demo_store().unwrap();
        let names: Vec<_> = store.list().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Gaming", "Music Production", "Movies"]);
        assert!(store
            .find_by_shortcut(&Shortcut::parse("ctrl+alt+m").unwrap())
            .is_some());
    }
}
