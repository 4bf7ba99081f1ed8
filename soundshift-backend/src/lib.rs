//! # SoundShift Backend
//!
//! The [`CommandInterface`] every frontend talks to, and [`LocalBackend`],
//! its authoritative implementation over a [`GroupStore`](group_store::GroupStore).
//!
//! ```text
//! frontend ──commands──▶ LocalBackend ──▶ GroupStore ──▶ StoreFile
//!    ▲                       │  │
//!    └──── Notification ─────┘  └──▶ AudioEndpoints / ShortcutRegistrar
//! ```
//!
//! Besides answering commands the backend is driven by the OS: a global
//! shortcut press ([`LocalBackend::handle_shortcut`]) and device topology
//! changes ([`LocalBackend::notify_devices_changed`]). Both are announced
//! to the subscriber as [`Notification`]s.

pub mod backend;
pub mod commands;
pub mod error;
pub mod registrar;

pub use backend::LocalBackend;
pub use commands::{CommandInterface, Notification, SwitchEvent};
pub use error::{CommandError, Result};
pub use registrar::{MemoryRegistrar, RegistrarError, ShortcutRegistrar};
