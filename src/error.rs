use strum::Display;
use thiserror::Error;

use crate::index::IndexError;

/// Extension point a failing extension was registered at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ExtensionStage {
    BeforeSync,
    AfterSync,
}

/// Error returned by a `before_sync`/`after_sync` extension
///
/// Extensions run with no isolation: the first failure skips the remaining
/// extensions of that stage and propagates to the caller of the save/delete
/// that triggered the sync.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ExtensionError(pub String);

impl ExtensionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<&str> for ExtensionError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<String> for ExtensionError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// Synchronization error types
#[derive(Debug, Error)]
pub enum SyncError {
    /// The external index collaborator's call failed. Never retried and never
    /// suppressed: the failure is visible as a failure of the save/delete
    /// operation that triggered the sync.
    #[error("index sync failed: {0}")]
    Index(#[from] IndexError),

    /// A registered extension failed
    #[error("{stage} extension failed: {message}")]
    Extension {
        stage: ExtensionStage,
        message: String,
    },

    /// Not found errors
    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type alias
pub type SyncResult<T> = std::result::Result<T, SyncError>;
