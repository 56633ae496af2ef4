//! Embedded full-text index client backed by Tantivy

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tantivy::collector::{Count, TopDocs};
use tantivy::query::QueryParser;
use tantivy::schema::{Field, Schema, Value, FAST, INDEXED, STORED, STRING, TEXT};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};
use tokio::sync::RwLock;

use crate::index::{Ack, IndexClient, IndexError, IndexResult};
use crate::models::{Document, IndexOp};

const WRITER_HEAP_SIZE: usize = 50_000_000;

/// Index statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    /// Total number of documents in the index
    pub total_documents: u64,

    /// Number of segments
    pub num_segments: usize,
}

/// Local full-text index implementing [`IndexClient`]
///
/// Documents are stored under a minimal generic schema: the identity as a raw
/// string field, the JSON body flattened into one full-text field, and the
/// snapshot timestamp as a date field. Every upsert deletes any previous
/// document with the same identity before adding the new one, and each
/// operation commits immediately so a sync acknowledgment means the change is
/// durable in the index.
pub struct TantivyIndex {
    id_field: Field,
    body_field: Field,
    updated_at_field: Field,
    writer: Arc<RwLock<IndexWriter>>,
    reader: IndexReader,
    index: Index,
}

impl TantivyIndex {
    /// Open or create an index at the given directory
    pub fn open(path: &Path) -> IndexResult<Self> {
        std::fs::create_dir_all(path)?;

        let schema = build_sync_schema();

        let index = if path.join("meta.json").exists() {
            Index::open_in_dir(path)?
        } else {
            Index::create_in_dir(path, schema.clone())?
        };

        let id_field = schema.get_field("id")?;
        let body_field = schema.get_field("body")?;
        let updated_at_field = schema.get_field("updated_at")?;

        let writer = index.writer(WRITER_HEAP_SIZE)?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()?;

        Ok(Self {
            id_field,
            body_field,
            updated_at_field,
            writer: Arc::new(RwLock::new(writer)),
            reader,
            index,
        })
    }

    /// Full-text search over document bodies, returning matching identities
    pub fn search(&self, query: &str, limit: usize) -> IndexResult<Vec<String>> {
        self.reader.reload()?;
        let searcher = self.reader.searcher();

        let parser = QueryParser::for_index(&self.index, vec![self.body_field]);
        let parsed = parser
            .parse_query(query)
            .map_err(|e| IndexError::Validation(e.to_string()))?;

        let top_docs = searcher.search(&parsed, &TopDocs::with_limit(limit))?;

        let mut identities = Vec::with_capacity(top_docs.len());
        for (_score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address)?;
            if let Some(id) = doc.get_first(self.id_field).and_then(|v| v.as_str()) {
                identities.push(id.to_string());
            }
        }

        Ok(identities)
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexResult<IndexStats> {
        self.reader.reload()?;
        let searcher = self.reader.searcher();

        let total_documents = searcher.search(&tantivy::query::AllQuery, &Count)? as u64;
        let num_segments = searcher.segment_readers().len();

        Ok(IndexStats {
            total_documents,
            num_segments,
        })
    }
}

#[async_trait]
impl IndexClient for TantivyIndex {
    async fn upsert(&self, identity: &str, document: &Document) -> IndexResult<Ack> {
        let body = serde_json::to_string(&document.body)?;

        let mut doc = TantivyDocument::new();
        doc.add_text(self.id_field, identity);
        doc.add_text(self.body_field, &body);
        doc.add_date(
            self.updated_at_field,
            tantivy::DateTime::from_timestamp_secs(document.updated_at.timestamp()),
        );

        let mut writer = self.writer.write().await;
        let term = tantivy::Term::from_field_text(self.id_field, identity);
        writer.delete_term(term);
        writer.add_document(doc)?;
        writer.commit()?;

        tracing::debug!(identity = %identity, "document upserted");
        Ok(Ack::new(identity, IndexOp::Upsert))
    }

    async fn remove(&self, identity: &str) -> IndexResult<Ack> {
        let mut writer = self.writer.write().await;
        let term = tantivy::Term::from_field_text(self.id_field, identity);
        writer.delete_term(term);
        writer.commit()?;

        tracing::debug!(identity = %identity, "document removed");
        Ok(Ack::new(identity, IndexOp::Remove))
    }
}

/// Build the generic sync schema
fn build_sync_schema() -> Schema {
    let mut schema_builder = Schema::builder();

    // Identity - stored, indexed as raw string
    schema_builder.add_text_field("id", STRING | STORED);

    // Body - full-text indexed JSON, stored
    schema_builder.add_text_field("body", TEXT | STORED);

    // Snapshot timestamp - date field with fast access
    schema_builder.add_date_field("updated_at", INDEXED | STORED | FAST);

    schema_builder.build()
}
