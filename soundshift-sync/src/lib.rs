//! # SoundShift Sync
//!
//! Keeps a frontend's copy of groups, devices and settings consistent with
//! the backend.
//!
//! ## Rules
//!
//! - State is fetched whole (groups, devices and settings together) and
//!   replaces local state; it is never patched field by field
//! - Each fetch is numbered; a response older than the newest request is
//!   dropped, so a slow fetch can never overwrite a newer one
//! - User actions are checked locally first. Invalid input never reaches
//!   the backend.
//! - Valid actions update local state optimistically, then the backend
//!   answer is confirmed by a refetch. On failure the optimistic state is
//!   discarded and the error is surfaced.
//! - Backend notifications (`devices-changed`, `device-switched`) trigger a
//!   refetch
//!
//! ## Usage
//!
//! Async callers drive a [`SyncController`] directly. Sync callers use a
//! [`SyncHandle`], which runs the controller on a background thread:
//!
//! ```rust,ignore
//! use soundshift_sync::prelude::*;
//!
//! let handle = SyncHandle::spawn(backend.clone(), backend.subscribe(16), SyncConfig::default())?;
//! handle.wait_until_loaded(std::time::Duration::from_secs(1));
//!
//! for group in handle.view().groups {
//!     println!("{} ({} online)", group.group.name, group.online_count());
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod handle;
pub mod sequence;
pub mod snapshot;
pub mod transaction;
pub mod worker;

pub use config::SyncConfig;
pub use controller::{CompletedFetch, RefreshOutcome, RefreshTrigger, SyncController};
pub use error::{Result, SyncError};
pub use handle::SyncHandle;
pub use sequence::{FetchTicket, SequenceCounter};
pub use snapshot::{Snapshot, SyncView};
pub use transaction::{PendingTransaction, TransactionLog};

/// Common imports
pub mod prelude {
    pub use crate::config::SyncConfig;
    pub use crate::controller::{RefreshTrigger, SyncController};
    pub use crate::error::SyncError;
    pub use crate::handle::SyncHandle;
    pub use crate::snapshot::SyncView;
}
