//! Error types for soundshift-sync

use std::time::Duration;

use group_store::ValidationError;
use soundshift_backend::CommandError;
use thiserror::Error;

/// Errors returned to callers of the sync controller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Rejected locally; no command was issued
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Invalid sync configuration: {0}")]
    Configuration(String),

    /// The background worker has stopped
    #[error("Sync worker disconnected")]
    WorkerDisconnected,
}

impl SyncError {
    /// A collaborator that did not answer within `timeout`
    pub fn timed_out(what: &str, timeout: Duration) -> Self {
        SyncError::Command(CommandError::Failure(format!(
            "{} timed out after {}ms",
            what,
            timeout.as_millis()
        )))
    }

    /// Text suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            SyncError::Validation(ValidationError::EmptyName) => "Please enter a group name".to_string(),
            SyncError::Validation(ValidationError::NoDevices) => "Please select at least one device".to_string(),
            SyncError::Validation(e) => e.to_string(),
            SyncError::Command(CommandError::NotFound(_)) => "That group no longer exists".to_string(),
            SyncError::Command(CommandError::InvalidSelection(e)) => e.to_string(),
            SyncError::Command(CommandError::Validation(e)) => e.to_string(),
            SyncError::Command(CommandError::Failure(msg)) => format!("Something went wrong: {}", msg),
            SyncError::Configuration(msg) => msg.clone(),
            SyncError::WorkerDisconnected => "SoundShift stopped responding".to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Command(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
