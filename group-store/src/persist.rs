//! JSON persistence for [`AppStore`]
//!
//! ```text
//! <config_dir>/soundshift/
//!   config.json       (pretty-printed AppStore)
//!   config.json.tmp   (only exists while a save is in progress)
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::model::{AppStore, STORE_VERSION};

const APP_DIR: &str = "soundshift";
const FILE_NAME: &str = "config.json";

/// A persisted store document on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFile {
    path: PathBuf,
}

impl StoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/soundshift/config.json`
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self::new(dir.join(APP_DIR).join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document
    ///
    /// Returns `Ok(None)` when the file does not exist yet. A document
    /// written by a newer schema version is rejected.
    pub fn load(&self) -> Result<Option<AppStore>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No store file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let store: AppStore = serde_json::from_str(&contents)?;
        if store.version > STORE_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: store.version,
                supported: STORE_VERSION,
            });
        }

        info!("Loaded {} groups from {}", store.groups.len(), self.path.display());
        Ok(Some(store))
    }

    /// Write the document atomically
    ///
    /// Serializes to a `.tmp` sibling and renames it over the target, so the
    /// target is either the old or the new document, never a partial one.
    pub fn save(&self, store: &AppStore) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
            }
        }

        let json = serde_json::to_string_pretty(store)?;
        let tmp_path = self.tmp_path();
        std::fs::write(&tmp_path, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;

        debug!("Saved {} groups to {}", store.groups.len(), self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
