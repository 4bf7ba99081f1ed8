//! # SoundShift SDK
//!
//! Define named groups of audio output devices, bind each group to a global
//! keyboard shortcut, and cycle the system default device through a group's
//! online members.
//!
//! ```rust,ignore
//! use soundshift_sdk::prelude::*;
//!
//! let system = SoundShift::builder()
//!     .with_endpoints(endpoints)
//!     .with_registrar(registrar)
//!     .with_default_store_file()?
//!     .build()?;
//!
//! let group = system.create_group(
//!     NewGroup::new("Gaming", devices).with_shortcut("Ctrl+Alt+G".parse()?),
//! )?;
//!
//! match system.cycle_group(&group.id)? {
//!     CycleOutcome::Switched { device, .. } => println!("Switched to {}", device.name),
//!     CycleOutcome::NoOnlineDevices => println!("No devices online"),
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! soundshift-sdk (sync facade)
//!     ↓
//! soundshift-sync (sequenced fetches, optimistic updates, worker thread)
//!     ↓
//! soundshift-backend (command interface, shortcut registration, persistence)
//!     ↓
//! soundshift-state (reconcile, cycle)   group-store (groups, settings)   shortcut-codec
//! ```

mod error;
mod system;

pub use error::{Result, SdkError};
pub use system::{demo_store, SoundShift, SoundShiftBuilder};

pub use group_store::{
    AppSettings, AudioDevice, DeviceGroup, DeviceId, GroupDevice, GroupId, NewGroup, StoreFile,
};
pub use shortcut_codec::{KeyDisposition, KeyEvent, Modifier, Modifiers, Shortcut, ShortcutRecorder};
pub use soundshift_backend::{MemoryRegistrar, ShortcutRegistrar, SwitchEvent};
pub use soundshift_state::logging::{self, LoggingMode};
pub use soundshift_state::{AudioEndpoints, CycleOutcome, MemoryEndpoints, ReconciledGroup, SlotStatus};
pub use soundshift_sync::{RefreshOutcome, SyncConfig, SyncError, SyncView};

/// Common imports
pub mod prelude {
    pub use crate::{
        AudioEndpoints, CycleOutcome, DeviceGroup, GroupDevice, NewGroup, SdkError, Shortcut,
        SoundShift, SyncConfig, SyncView,
    };
}
