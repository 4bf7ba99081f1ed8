//! Error types for shortcut-codec

use thiserror::Error;

/// Errors produced while building or parsing a shortcut
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortcutError {
    #[error("Shortcut is empty")]
    Empty,

    #[error("Shortcut '{0}' has no non-modifier key")]
    MissingKey(String),

    #[error("Shortcut '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("Shortcut '{0}' has more than one non-modifier key")]
    MultipleKeys(String),
}

/// Errors produced by the recorder state machine
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderError {
    #[error("Cannot clear the shortcut while a capture is in progress")]
    Recording,
}

/// Result type for shortcut-codec operations
pub type Result<T> = std::result::Result<T, ShortcutError>;
