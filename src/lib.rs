//! Lifecycle-driven synchronization between domain models and a search index
//!
//! Keeps a secondary search index synchronized with the mutable state of a
//! primary data model by reacting to lifecycle transitions (create, update,
//! delete) and issuing the corresponding index operations:
//!
//! - **[`lifecycle`]** — the core: [`LifecycleObserver`] binds synchronization
//!   to a model type's mutation hooks, with `before_sync`/`after_sync`
//!   extension points; [`Tracked`] supplies deletion detection for types that
//!   cannot natively answer "was this instance destroyed"
//! - **[`index`]** — the narrow collaborator boundary ([`IndexClient`]:
//!   upsert/remove) plus two bundled clients, one in-memory and one backed by
//!   an embedded Tantivy index
//! - **[`store`]** — an in-memory host store showing the intended wiring
//!
//! Synchronization is best-effort and eventually consistent: it runs inline on
//! the task performing the mutation, after the primary write is durable, with
//! exactly one index call per committed mutation and no internal retry. An
//! index failure surfaces as a failure of the save/delete that triggered it.
//!
//! # Example
//!
//! ```no_run
//! use search_sync::{
//!     Document, InMemoryIndex, LifecycleEvent, LifecycleObserver, ManagedEntity,
//!     ModelDescriptor,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[derive(Clone)]
//! struct Article {
//!     id: String,
//!     title: String,
//! }
//!
//! impl ManagedEntity for Article {
//!     fn identity(&self) -> String {
//!         self.id.clone()
//!     }
//!
//!     fn to_document(&self) -> Document {
//!         Document::new(self.id.clone(), json!({ "title": self.title }))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let observer = LifecycleObserver::new(Arc::new(InMemoryIndex::new()));
//!
//!     let binding = observer
//!         .attach(
//!             ModelDescriptor::new("article")
//!                 .with_post_save()
//!                 .with_post_destroy()
//!                 .with_pre_destroy(),
//!         )
//!         .expect("article supports sync");
//!
//!     let article = binding.track(Article {
//!         id: "a-1".to_string(),
//!         title: "hello".to_string(),
//!     });
//!     binding.after_save(&article, LifecycleEvent::Created).await?;
//!
//!     binding.before_destroy(&article);
//!     binding.after_destroy(&article).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod lifecycle;
pub mod models;
pub mod store;

pub use config::{SyncConfig, SyncConfigBuilder};
pub use error::{ExtensionError, ExtensionStage, SyncError, SyncResult};
pub use index::{Ack, IndexClient, IndexError, IndexResult, InMemoryIndex, TantivyIndex};
pub use lifecycle::{
    DeletionDetection, DeletionStateTracker, LifecycleObserver, ModelBinding, ModelDescriptor,
    Tracked,
};
pub use models::{Document, IndexOp, LifecycleEvent, ManagedEntity, SyncEvent, SyncOutcome};
pub use store::SyncedStore;
