//! Boundary to the OS global-shortcut facility

use std::collections::HashSet;

use parking_lot::Mutex;
use shortcut_codec::Shortcut;
use thiserror::Error;
use tracing::debug;

/// Failure to (un)register a global shortcut
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrarError {
    #[error("Shortcut {0} is already taken by another application")]
    Taken(Shortcut),

    #[error("Shortcut registration failed: {0}")]
    Failed(String),
}

/// Registers global key combinations with the OS
///
/// Calls are synchronous and cheap; the backend makes them while holding
/// its store lock.
pub trait ShortcutRegistrar: Send + Sync {
    fn register(&self, shortcut: &Shortcut) -> Result<(), RegistrarError>;

    fn unregister(&self, shortcut: &Shortcut) -> Result<(), RegistrarError>;
}

/// Registrar that only records what is registered
#[derive(Debug, Default)]
pub struct MemoryRegistrar {
    registered: Mutex<HashSet<Shortcut>>,
    taken: Mutex<HashSet<Shortcut>>,
}

impl MemoryRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend another application owns `shortcut`
    pub fn mark_taken(&self, shortcut: Shortcut) {
        self.taken.lock().insert(shortcut);
    }

    pub fn is_registered(&self, shortcut: &Shortcut) -> bool {
        self.registered.lock().contains(shortcut)
    }

    /// Registered shortcuts as canonical strings, sorted
    pub fn registered(&self) -> Vec<String> {
        let mut all: Vec<String> = self.registered.lock().iter().map(|s| s.to_string()).collect();
        all.sort();
        all
    }
}

impl ShortcutRegistrar for MemoryRegistrar {
    fn register(&self, shortcut: &Shortcut) -> Result<(), RegistrarError> {
        if self.taken.lock().contains(shortcut) {
            return Err(RegistrarError::Taken(shortcut.clone()));
        }
        debug!("Registered shortcut {}", shortcut);
        self.registered.lock().insert(shortcut.clone());
        Ok(())
    }

    fn unregister(&self, shortcut: &Shortcut) -> Result<(), RegistrarError> {
        debug!("Unregistered shortcut {}", shortcut);
        self.registered.lock().remove(shortcut);
        Ok(())
    }
}
