use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::index::{Ack, IndexClient, IndexResult};
use crate::models::{Document, IndexOp};

/// In-memory index client (for MVP and testing)
///
/// Stores documents in a map and counts every operation, so tests can assert
/// exact call counts. Remove is idempotent: removing an absent identity still
/// acknowledges, matching the usual delete semantics of search backends.
#[derive(Clone, Default)]
pub struct InMemoryIndex {
    documents: Arc<DashMap<String, Document>>,
    upserts: Arc<AtomicUsize>,
    removes: Arc<AtomicUsize>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently indexed
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Fetch an indexed document by identity
    pub fn document(&self, identity: &str) -> Option<Document> {
        self.documents.get(identity).map(|entry| entry.clone())
    }

    /// Total upsert calls observed
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    /// Total remove calls observed
    pub fn remove_count(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IndexClient for InMemoryIndex {
    async fn upsert(&self, identity: &str, document: &Document) -> IndexResult<Ack> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.documents
            .insert(identity.to_string(), document.clone());

        tracing::debug!(identity = %identity, "document upserted");
        Ok(Ack::new(identity, IndexOp::Upsert))
    }

    async fn remove(&self, identity: &str) -> IndexResult<Ack> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.documents.remove(identity);

        tracing::debug!(identity = %identity, "document removed");
        Ok(Ack::new(identity, IndexOp::Remove))
    }
}
