//! Persisted root document

use super::{AppSettings, DeviceGroup};
use serde::{Deserialize, Serialize};

/// Schema version written by this build
pub const STORE_VERSION: u32 = 1;

/// Everything that is persisted: groups, settings and the schema version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStore {
    #[serde(default)]
    pub groups: Vec<DeviceGroup>,
    #[serde(default)]
    pub settings: AppSettings,
    #[serde(default = "current_version")]
    pub version: u32,
}

fn current_version() -> u32 {
    STORE_VERSION
}

impl Default for AppStore {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            settings: AppSettings::default(),
            version: STORE_VERSION,
        }
    }
}
