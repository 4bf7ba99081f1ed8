//! Error types for soundshift-state

use group_store::DeviceId;
use thiserror::Error;

/// Failure reported by the OS audio collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Audio device not found: {0}")]
    DeviceNotFound(DeviceId),

    #[error("Audio subsystem error: {0}")]
    Failed(String),
}

/// A select target that cannot be activated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Slot {index} does not exist in a group of {len} devices")]
    OutOfRange { index: usize, len: usize },

    #[error("Device '{name}' in slot {index} is offline")]
    Offline { index: usize, name: String },
}

/// Errors from cycling or selecting within a group
#[derive(Error, Debug)]
pub enum CycleError {
    /// The audio collaborator failed; the active slot was not changed
    #[error("Switching device failed: {0}")]
    Command(#[from] EndpointError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

impl CycleError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, CycleError::Command(_))
    }
}

/// Result type for cycle operations
pub type Result<T> = std::result::Result<T, CycleError>;
