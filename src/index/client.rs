use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Document, IndexOp};

/// Result type for index operations
pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Errors that can occur at the index collaborator boundary
#[derive(Debug, Error)]
pub enum IndexError {
    /// Network error reaching the backend
    #[error("network error: {0}")]
    Network(String),

    /// Backend did not answer in time
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// Backend rejected the document or identity
    #[error("validation error: {0}")]
    Validation(String),

    /// Backend-side failure
    #[error("backend error: {0}")]
    Backend(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tantivy::TantivyError> for IndexError {
    fn from(err: tantivy::TantivyError) -> Self {
        IndexError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for IndexError {
    fn from(err: serde_json::Error) -> Self {
        IndexError::Serialization(err.to_string())
    }
}

/// Acknowledgment of a completed index operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    /// Identity the operation addressed
    pub identity: String,

    /// Operation that was acknowledged
    pub op: IndexOp,

    /// Receipt issued by the client
    pub receipt: Uuid,

    /// Acknowledgment timestamp
    pub acknowledged_at: DateTime<Utc>,
}

impl Ack {
    pub fn new(identity: impl Into<String>, op: IndexOp) -> Self {
        Self {
            identity: identity.into(),
            op,
            receipt: Uuid::new_v4(),
            acknowledged_at: Utc::now(),
        }
    }
}

/// Trait for index collaborators
///
/// The only coupling between the synchronization core and the search backend.
/// Cancellation, timeouts, and retries are the implementor's policy; the core
/// issues exactly one call per sync attempt and never retries.
#[async_trait]
pub trait IndexClient: Send + Sync {
    /// Insert-or-replace the entity's serialized state
    async fn upsert(&self, identity: &str, document: &Document) -> IndexResult<Ack>;

    /// Remove the entity from the index
    async fn remove(&self, identity: &str) -> IndexResult<Ack>;
}
