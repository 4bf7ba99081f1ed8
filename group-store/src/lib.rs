//! # Group Store
//!
//! Device-group model, validated store and JSON persistence.
//!
//! A [`DeviceGroup`] is a named, ordered list of device references with one
//! active slot and an optional [`Shortcut`](shortcut_codec::Shortcut). The
//! [`GroupStore`] owns all groups and guarantees their invariants:
//!
//! - every group has at least one device, each device id at most once
//! - `current_index` always points at an existing slot
//! - no two groups share a shortcut
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use group_store::{GroupDevice, GroupStore, NewGroup, StoreFile};
//!
//! let file = StoreFile::default_location()?;
//! let mut store = file.load()?.map(GroupStore::from_app_store).unwrap_or_default();
//!
//! store.create(NewGroup::new("Gaming", vec![GroupDevice::new("dev-2", "Headphones")]))?;
//! file.save(&store.to_app_store())?;
//! ```

pub mod error;
pub mod model;
pub mod persist;
pub mod store;
pub mod validate;

pub use error::{Result, StoreError, ValidationError};
pub use model::{
    AppSettings, AppStore, AudioDevice, DeviceGroup, DeviceId, GroupDevice, GroupId, GroupUpdate, NewGroup,
    STORE_VERSION,
};
pub use persist::StoreFile;
pub use store::GroupStore;
