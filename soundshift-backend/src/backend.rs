//! Authoritative local backend
//!
//! [`LocalBackend`] owns the [`GroupStore`], talks to the OS collaborators
//! and persists every change. It is shared between the sync worker and
//! OS-side callers (global shortcut hook, device topology watcher), so the
//! store sits behind a mutex that is never held across an await.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use group_store::{
    validate, AppSettings, AppStore, AudioDevice, DeviceGroup, DeviceId, GroupDevice, GroupId, GroupStore,
    GroupUpdate, NewGroup, StoreFile, ValidationError,
};
use parking_lot::Mutex;
use shortcut_codec::Shortcut;
use soundshift_state::{cycle, select, AudioEndpoints, CycleOutcome};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

use crate::commands::{CommandInterface, Notification, SwitchEvent};
use crate::error::{CommandError, Result};
use crate::registrar::ShortcutRegistrar;

/// Command interface implementation backed by a local [`GroupStore`]
///
/// # Example
///
/// ```rust,ignore
/// let backend = LocalBackend::open(
///     Arc::new(MemoryEndpoints::demo()),
///     Arc::new(MemoryRegistrar::new()),
///     Some(StoreFile::default_location()?),
/// )?;
/// let mut notifications = backend.subscribe(16);
///
/// backend.handle_shortcut(&"Ctrl+Alt+G".parse()?).await?;
/// ```
pub struct LocalBackend {
    store: Mutex<GroupStore>,
    endpoints: Arc<dyn AudioEndpoints>,
    registrar: Arc<dyn ShortcutRegistrar>,
    file: Option<StoreFile>,
    notifications: Mutex<Option<mpsc::Sender<Notification>>>,

    /// Bumped for every snapshot taken under the store lock
    revision: AtomicU64,
    /// Newest revision written to `file`; held while writing
    saved_revision: Mutex<u64>,
}

/// Persisted document captured under the store lock
struct PendingSave {
    revision: u64,
    document: AppStore,
}

impl LocalBackend {
    /// Load the store from `file` (if given) and register every shortcut
    ///
    /// A missing file starts an empty store. A persisted shortcut the OS
    /// refuses is logged and left unregistered.
    pub fn open(
        endpoints: Arc<dyn AudioEndpoints>,
        registrar: Arc<dyn ShortcutRegistrar>,
        file: Option<StoreFile>,
    ) -> Result<Self> {
        let store = match &file {
            Some(file) => file
                .load()?
                .map(GroupStore::from_app_store)
                .unwrap_or_default(),
            None => GroupStore::new(),
        };

        let backend = Self::with_store(store, endpoints, registrar);
        Ok(Self { file, ..backend })
    }

    /// Wrap an existing store without persistence
    pub fn with_store(
        store: GroupStore,
        endpoints: Arc<dyn AudioEndpoints>,
        registrar: Arc<dyn ShortcutRegistrar>,
    ) -> Self {
        for group in store.list() {
            if let Some(shortcut) = &group.shortcut {
                if let Err(e) = registrar.register(shortcut) {
                    warn!("Could not register {} for group '{}': {}", shortcut, group.name, e);
                }
            }
        }

        info!("Backend opened with {} groups", store.len());
        Self {
            store: Mutex::new(store),
            endpoints,
            registrar,
            file: None,
            notifications: Mutex::new(None),
            revision: AtomicU64::new(0),
            saved_revision: Mutex::new(0),
        }
    }

    /// Receive backend notifications
    ///
    /// Replaces any previous subscriber. Publishing never blocks: when the
    /// channel is full the notification is dropped, since the subscriber
    /// already has a refresh pending.
    pub fn subscribe(&self, buffer: usize) -> mpsc::Receiver<Notification> {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        *self.notifications.lock() = Some(tx);
        rx
    }

    /// Snapshot of the persisted document
    pub fn app_store(&self) -> AppStore {
        self.store.lock().to_app_store()
    }

    // ========================================================================
    // OS-side entry points
    // ========================================================================

    /// Global shortcut pressed
    ///
    /// Cycles the group bound to `shortcut`. Returns `None` when no group
    /// is bound to it.
    pub async fn handle_shortcut(&self, shortcut: &Shortcut) -> Result<Option<CycleOutcome>> {
        let group_id = {
            let store = self.store.lock();
            store.find_by_shortcut(shortcut).map(|g| g.id.clone())
        };

        match group_id {
            Some(id) => {
                debug!("Shortcut {} -> group {}", shortcut, id);
                self.cycle_group(&id).await.map(Some)
            }
            None => {
                debug!("Shortcut {} is not bound to any group", shortcut);
                Ok(None)
            }
        }
    }

    /// Audio device topology changed
    pub fn notify_devices_changed(&self) {
        self.publish(Notification::DevicesChanged);
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn publish(&self, notification: Notification) {
        let mut slot = self.notifications.lock();
        let Some(tx) = slot.as_ref() else {
            return;
        };

        match tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(n)) => {
                debug!("Notification channel full, dropping {}", n.tag());
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Notification subscriber gone");
                *slot = None;
            }
        }
    }

    /// Capture the document to persist. Call with the store lock held.
    fn snapshot(&self, store: &GroupStore) -> Option<PendingSave> {
        if self.file.is_none() {
            return None;
        }
        Some(PendingSave {
            revision: self.revision.fetch_add(1, Ordering::SeqCst) + 1,
            document: store.to_app_store(),
        })
    }

    /// Write a snapshot after the store lock is released
    ///
    /// Saves are serialized, and a snapshot older than the one already on
    /// disk is skipped.
    fn save(&self, pending: Option<PendingSave>) {
        let (Some(file), Some(pending)) = (&self.file, pending) else {
            return;
        };

        let mut saved = self.saved_revision.lock();
        if pending.revision <= *saved {
            debug!("Skipping save of revision {}, {} already on disk", pending.revision, *saved);
            return;
        }
        match file.save(&pending.document) {
            Ok(()) => *saved = pending.revision,
            Err(e) => warn!("Failed to persist store to {}: {}", file.path().display(), e),
        }
    }

    fn group(&self, id: &GroupId) -> Result<DeviceGroup> {
        self.store
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| CommandError::NotFound(id.clone()))
    }

    /// Commit a switch made by the cycle engine and announce it
    ///
    /// The group may have been edited while the OS call was in flight, so
    /// the active slot is found by device id. Returns the committed index.
    fn commit_switch(&self, id: &GroupId, device: &GroupDevice) -> Result<usize> {
        let committed = {
            let mut store = self.store.lock();
            let position = store
                .get(id)
                .ok_or_else(|| CommandError::NotFound(id.clone()))?
                .position_of(&device.id);
            match position {
                Some(index) => {
                    store.set_current_index(id, index)?;
                    Some((index, self.snapshot(&store)))
                }
                None => None,
            }
        };

        let Some((index, pending)) = committed else {
            warn!("Device {} left group {} while switching to it", device.id, id);
            self.publish(Notification::DevicesChanged);
            return Err(CommandError::Failure(format!(
                "{} was removed from the group during the switch",
                device.name
            )));
        };
        self.save(pending);

        let event = SwitchEvent {
            group_id: id.clone(),
            device_id: device.id.clone(),
            device_name: device.name.clone(),
        };
        info!("{}", event.message());
        self.publish(Notification::DeviceSwitched(event));
        Ok(index)
    }
}

fn check_shortcut_free(store: &GroupStore, shortcut: &Shortcut, owner: Option<&GroupId>) -> Result<()> {
    match store.find_by_shortcut(shortcut) {
        Some(other) if Some(&other.id) != owner => Err(ValidationError::DuplicateShortcut {
            shortcut: shortcut.clone(),
            group: other.name.clone(),
        }
        .into()),
        _ => Ok(()),
    }
}

#[async_trait]
impl CommandInterface for LocalBackend {
    async fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        Ok(self.endpoints.list_devices().await?)
    }

    async fn set_default_device(&self, id: &DeviceId) -> Result<()> {
        self.endpoints.set_default_device(id).await?;
        Ok(())
    }

    async fn list_groups(&self) -> Result<Vec<DeviceGroup>> {
        Ok(self.store.lock().list().to_vec())
    }

    async fn create_group(&self, group: NewGroup) -> Result<DeviceGroup> {
        let mut store = self.store.lock();

        validate::validate_group(&group.name, &group.devices)?;
        if let Some(shortcut) = &group.shortcut {
            check_shortcut_free(&store, shortcut, None)?;
            self.registrar.register(shortcut)?;
        }

        let shortcut = group.shortcut.clone();
        let created = match store.create(group) {
            Ok(created) => created,
            Err(e) => {
                if let Some(shortcut) = &shortcut {
                    let _ = self.registrar.unregister(shortcut);
                }
                return Err(e.into());
            }
        };

        let pending = self.snapshot(&store);
        drop(store);
        self.save(pending);
        Ok(created)
    }

    async fn update_group(&self, group: DeviceGroup) -> Result<DeviceGroup> {
        let mut store = self.store.lock();
        let previous = store
            .get(&group.id)
            .map(|g| g.shortcut.clone())
            .ok_or_else(|| CommandError::NotFound(group.id.clone()))?;

        validate::validate_group(&group.name, &group.devices)?;
        validate::validate_index(group.current_index, group.devices.len())?;

        let changed = previous != group.shortcut;
        let added = if changed { group.shortcut.clone() } else { None };
        if let Some(shortcut) = &added {
            check_shortcut_free(&store, shortcut, Some(&group.id))?;
            self.registrar.register(shortcut)?;
        }

        let updated = match store.update(GroupUpdate::from(group)) {
            Ok(updated) => updated,
            Err(e) => {
                if let Some(shortcut) = &added {
                    let _ = self.registrar.unregister(shortcut);
                }
                return Err(e.into());
            }
        };

        if changed {
            if let Some(old) = &previous {
                if let Err(e) = self.registrar.unregister(old) {
                    warn!("Could not unregister {}: {}", old, e);
                }
            }
        }

        let pending = self.snapshot(&store);
        drop(store);
        self.save(pending);
        Ok(updated)
    }

    async fn delete_group(&self, id: &GroupId) -> Result<()> {
        let mut store = self.store.lock();
        let removed = store.delete(id)?;

        if let Some(shortcut) = &removed.shortcut {
            if let Err(e) = self.registrar.unregister(shortcut) {
                warn!("Could not unregister {}: {}", shortcut, e);
            }
        }

        let pending = self.snapshot(&store);
        drop(store);
        self.save(pending);
        Ok(())
    }

    async fn cycle_group(&self, id: &GroupId) -> Result<CycleOutcome> {
        let mut group = self.group(id)?;
        match cycle(self.endpoints.as_ref(), &mut group).await? {
            CycleOutcome::Switched { device, .. } => {
                let index = self.commit_switch(id, &device)?;
                Ok(CycleOutcome::Switched { index, device })
            }
            CycleOutcome::NoOnlineDevices => Ok(CycleOutcome::NoOnlineDevices),
        }
    }

    async fn select_group_device(&self, id: &GroupId, index: usize) -> Result<GroupDevice> {
        let mut group = self.group(id)?;
        let device = select(self.endpoints.as_ref(), &mut group, index).await?;

        self.commit_switch(id, &device)?;
        Ok(device)
    }

    async fn get_settings(&self) -> Result<AppSettings> {
        Ok(self.store.lock().settings())
    }

    async fn update_settings(&self, settings: AppSettings) -> Result<AppSettings> {
        let mut store = self.store.lock();
        let settings = store.update_settings(settings);
        let pending = self.snapshot(&store);
        drop(store);
        self.save(pending);
        Ok(settings)
    }
}
