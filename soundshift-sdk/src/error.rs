use group_store::StoreError;
use shortcut_codec::ShortcutError;
use soundshift_backend::CommandError;
use soundshift_sync::SyncError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid shortcut: {0}")]
    Shortcut(#[from] ShortcutError),

    #[error("No audio endpoints configured")]
    MissingEndpoints,

    #[error("Failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl SdkError {
    /// Text suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            SdkError::Sync(e) => e.user_message(),
            SdkError::Command(e) => SyncError::from(e.clone()).user_message(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
