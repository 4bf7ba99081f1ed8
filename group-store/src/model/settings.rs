//! Application settings

use serde::{Deserialize, Serialize};

/// User-facing application settings
///
/// Fields missing from persisted data default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub run_on_startup: bool,
    pub start_minimized: bool,
    pub close_to_tray: bool,
}
