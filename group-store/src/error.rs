//! Error types for group-store

use std::path::PathBuf;

use shortcut_codec::Shortcut;
use thiserror::Error;

use crate::model::{DeviceId, GroupId};

/// A rejected create/update request
///
/// Raised before anything is changed; a failed validation never mutates
/// the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Group name cannot be empty")]
    EmptyName,

    #[error("A group needs at least one device")]
    NoDevices,

    #[error("Device {0} appears more than once in the group")]
    DuplicateDevice(DeviceId),

    #[error("Shortcut {shortcut} is already used by group '{group}'")]
    DuplicateShortcut { shortcut: Shortcut, group: String },

    #[error("Device index {index} is out of range for a group of {len} devices")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors that can occur in the group store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Group not found: {0}")]
    NotFound(GroupId),

    #[error("Store file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}

/// Result type for group-store operations
pub type Result<T> = std::result::Result<T, StoreError>;
