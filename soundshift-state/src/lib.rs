//! # SoundShift State
//!
//! Everything that turns persisted groups plus the live device list into
//! something a user can act on:
//!
//! - [`reconcile`]: per-slot online status and display names
//! - [`cycle`]: which slot comes next, and the switch-then-commit contract
//! - [`endpoints`]: the OS audio boundary and its in-memory implementation
//! - [`logging`]: `tracing-subscriber` setup
//!
//! ```text
//! AudioEndpoints::list_devices ─┐
//!                               ├─▶ reconcile ─▶ next_index ─▶ set_default_device ─▶ commit index
//! DeviceGroup ──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use soundshift_state::prelude::*;
//!
//! let endpoints = MemoryEndpoints::demo();
//! match cycle(&endpoints, &mut group).await? {
//!     CycleOutcome::Switched { device, .. } => println!("Switched to {}", device.name),
//!     CycleOutcome::NoOnlineDevices => println!("No devices online"),
//! }
//! ```

pub mod cycle;
pub mod endpoints;
pub mod error;
pub mod logging;
pub mod reconcile;

pub use cycle::{check_selection, cycle, next_index, select, CycleDecision, CycleOutcome};
pub use endpoints::{AudioEndpoints, MemoryEndpoints};
pub use error::{CycleError, EndpointError, Result, SelectionError};
pub use reconcile::{online_indices, reconcile, reconcile_all, ReconciledGroup, SlotStatus};

/// Common imports
pub mod prelude {
    pub use crate::cycle::{cycle, select, CycleOutcome};
    pub use crate::endpoints::{AudioEndpoints, MemoryEndpoints};
    pub use crate::error::{CycleError, EndpointError, SelectionError};
    pub use crate::reconcile::{reconcile_all, ReconciledGroup, SlotStatus};
}
