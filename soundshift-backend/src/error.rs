//! Error types for soundshift-backend

use group_store::{GroupId, StoreError, ValidationError};
use soundshift_state::{CycleError, EndpointError, SelectionError};
use thiserror::Error;

use crate::registrar::RegistrarError;

/// Errors returned by [`CommandInterface`](crate::CommandInterface) calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Group not found: {0}")]
    NotFound(GroupId),

    #[error("Invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),

    /// A collaborator rejected the command or could not complete it
    #[error("Command failed: {0}")]
    Failure(String),
}

impl CommandError {
    /// Whether retrying the same command may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, CommandError::Failure(_))
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => CommandError::Validation(e),
            StoreError::NotFound(id) => CommandError::NotFound(id),
            other => CommandError::Failure(other.to_string()),
        }
    }
}

impl From<CycleError> for CommandError {
    fn from(err: CycleError) -> Self {
        match err {
            CycleError::Command(e) => e.into(),
            CycleError::Selection(e) => CommandError::InvalidSelection(e),
        }
    }
}

impl From<EndpointError> for CommandError {
    fn from(err: EndpointError) -> Self {
        CommandError::Failure(err.to_string())
    }
}

impl From<RegistrarError> for CommandError {
    fn from(err: RegistrarError) -> Self {
        CommandError::Failure(err.to_string())
    }
}

/// Result type for backend commands
pub type Result<T> = std::result::Result<T, CommandError>;
