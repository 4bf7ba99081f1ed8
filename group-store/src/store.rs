//! The group store
//!
//! [`GroupStore`] owns every [`DeviceGroup`] and the [`AppSettings`]. All
//! mutations are validated first and applied only when every check passes,
//! so a failed call leaves the store exactly as it was.

use std::collections::HashSet;

use shortcut_codec::Shortcut;
use tracing::{debug, warn};

use crate::error::{Result, StoreError, ValidationError};
use crate::model::{AppSettings, AppStore, DeviceGroup, GroupId, GroupUpdate, NewGroup, STORE_VERSION};
use crate::validate::{validate_group, validate_index};

/// Validated collection of device groups plus application settings
///
/// Groups are kept in creation order.
///
/// # Example
///
/// ```rust
/// use group_store::{GroupDevice, GroupStore, NewGroup};
///
/// let mut store = GroupStore::new();
/// let group = store.create(NewGroup::new(
///     "  Movies ",
///     vec![GroupDevice::new("dev-5", "LG TV"), GroupDevice::new("dev-1", "Speakers")],
/// ))?;
///
/// assert_eq!(group.name, "Movies");
/// assert_eq!(group.current_index, 0);
/// assert_eq!(store.len(), 1);
/// # Ok::<(), group_store::StoreError>(())
/// ```
pub struct GroupStore {
    groups: Vec<DeviceGroup>,
    settings: AppSettings,
}

impl GroupStore {
    /// Create an empty store with default settings
    pub fn new() -> Self {
        Self::with_contents(Vec::new(), AppSettings::default())
    }

    fn with_contents(groups: Vec<DeviceGroup>, settings: AppSettings) -> Self {
        Self { groups, settings }
    }

    /// Build a store from a persisted document
    ///
    /// Persisted data may have been edited by hand, so each group is
    /// repaired rather than trusted:
    ///
    /// - groups without devices are dropped
    /// - a group id already used by an earlier group is replaced
    /// - repeated device ids keep their first occurrence, and the active
    ///   slot follows its device to the surviving position
    /// - an out-of-range index resets to 0
    /// - a shortcut already claimed by an earlier group is cleared
    pub fn from_app_store(store: AppStore) -> Self {
        let mut groups: Vec<DeviceGroup> = Vec::with_capacity(store.groups.len());

        for mut group in store.groups {
            let active = group.current_device().map(|d| d.id.clone());
            let mut seen = HashSet::new();
            group.devices.retain(|d| seen.insert(d.id.clone()));
            if let Some(index) = active.and_then(|id| group.position_of(&id)) {
                group.current_index = index;
            }

            if group.devices.is_empty() {
                warn!("Dropping persisted group '{}' ({}): no devices", group.name, group.id);
                continue;
            }
            if groups.iter().any(|g| g.id == group.id) {
                let id = GroupId::generate();
                warn!("Group '{}' reuses id {}, assigning {}", group.name, group.id, id);
                group.id = id;
            }
            if group.current_index >= group.devices.len() {
                warn!(
                    "Group '{}' had index {} for {} devices, resetting to 0",
                    group.name,
                    group.current_index,
                    group.devices.len()
                );
                group.current_index = 0;
            }
            if let Some(shortcut) = &group.shortcut {
                if groups.iter().any(|g| g.shortcut.as_ref() == Some(shortcut)) {
                    warn!("Clearing duplicate shortcut {} on group '{}'", shortcut, group.name);
                    group.shortcut = None;
                }
            }
            if group.name.trim().is_empty() {
                warn!("Persisted group {} has a blank name", group.id);
            }
            groups.push(group);
        }

        debug!("Loaded {} groups from persisted store", groups.len());
        Self::with_contents(groups, store.settings)
    }

    /// Snapshot of everything that is persisted
    pub fn to_app_store(&self) -> AppStore {
        AppStore {
            groups: self.groups.clone(),
            settings: self.settings,
            version: STORE_VERSION,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All groups in creation order
    pub fn list(&self) -> &[DeviceGroup] {
        &self.groups
    }

    pub fn get(&self, id: &GroupId) -> Option<&DeviceGroup> {
        self.groups.iter().find(|g| &g.id == id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The group bound to a shortcut
    pub fn find_by_shortcut(&self, shortcut: &Shortcut) -> Option<&DeviceGroup> {
        self.groups.iter().find(|g| g.shortcut.as_ref() == Some(shortcut))
    }

    pub fn settings(&self) -> AppSettings {
        self.settings
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a group with a fresh id and the first slot active
    pub fn create(&mut self, new: NewGroup) -> Result<DeviceGroup> {
        let name = validate_group(&new.name, &new.devices)?;
        self.check_shortcut_free(new.shortcut.as_ref(), None)?;

        let group = DeviceGroup {
            id: GroupId::generate(),
            name,
            devices: new.devices,
            shortcut: new.shortcut,
            current_index: 0,
        };

        debug!("Created group '{}' ({})", group.name, group.id);
        self.groups.push(group.clone());
        Ok(group)
    }

    /// Replace a group's name, devices and shortcut
    ///
    /// With `current_index: None` the stored index is kept, unless the new
    /// device list is too short for it, in which case it resets to 0.
    pub fn update(&mut self, update: GroupUpdate) -> Result<DeviceGroup> {
        let position = self.position(&update.id)?;
        let name = validate_group(&update.name, &update.devices)?;
        self.check_shortcut_free(update.shortcut.as_ref(), Some(&update.id))?;

        let len = update.devices.len();
        let current_index = match update.current_index {
            Some(index) => {
                validate_index(index, len)?;
                index
            }
            None => {
                let stored = self.groups[position].current_index;
                if stored < len {
                    stored
                } else {
                    debug!("Active slot {} no longer exists, resetting to 0", stored);
                    0
                }
            }
        };

        let group = DeviceGroup {
            id: update.id,
            name,
            devices: update.devices,
            shortcut: update.shortcut,
            current_index,
        };

        debug!("Updated group '{}' ({})", group.name, group.id);
        self.groups[position] = group.clone();
        Ok(group)
    }

    /// Remove a group, returning it
    pub fn delete(&mut self, id: &GroupId) -> Result<DeviceGroup> {
        let position = self.position(id)?;
        let removed = self.groups.remove(position);

        debug!("Deleted group '{}' ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// Make `index` the active slot of a group
    pub fn set_current_index(&mut self, id: &GroupId, index: usize) -> Result<DeviceGroup> {
        let position = self.position(id)?;
        let group = &mut self.groups[position];
        validate_index(index, group.devices.len())?;

        group.current_index = index;
        let group = group.clone();

        debug!("Group '{}' active slot -> {}", group.name, index);
        Ok(group)
    }

    pub fn update_settings(&mut self, settings: AppSettings) -> AppSettings {
        self.settings = settings;
        settings
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn position(&self, id: &GroupId) -> Result<usize> {
        self.groups
            .iter()
            .position(|g| &g.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn check_shortcut_free(&self, shortcut: Option<&Shortcut>, owner: Option<&GroupId>) -> Result<()> {
        let Some(shortcut) = shortcut else {
            return Ok(());
        };

        let conflict = self
            .groups
            .iter()
            .filter(|g| Some(&g.id) != owner)
            .find(|g| g.shortcut.as_ref() == Some(shortcut));

        match conflict {
            Some(other) => Err(ValidationError::DuplicateShortcut {
                shortcut: shortcut.clone(),
                group: other.name.clone(),
            }
            .into()),
            None => Ok(()),
        }
    }
}

impl Default for GroupStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GroupStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupStore")
            .field("group_count", &self.groups.len())
            .field("settings", &self.settings)
            .finish()
    }
}
