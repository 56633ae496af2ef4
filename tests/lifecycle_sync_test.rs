//! Comprehensive tests for lifecycle-driven index synchronization

use async_trait::async_trait;
use search_sync::{
    Ack, Document, ExtensionError, IndexClient, IndexError, IndexOp, IndexResult, InMemoryIndex,
    LifecycleObserver, ManagedEntity, ModelDescriptor, SyncError, SyncOutcome, SyncedStore,
    TantivyIndex,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Clone)]
struct Article {
    id: String,
    title: String,
}

impl Article {
    fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
        }
    }
}

impl ManagedEntity for Article {
    fn identity(&self) -> String {
        self.id.clone()
    }

    fn to_document(&self) -> Document {
        Document::new(self.id.clone(), json!({ "title": self.title }))
    }
}

/// Descriptor for a model with hooks but no native deletion query
fn article_descriptor() -> ModelDescriptor {
    ModelDescriptor::new("article")
        .with_post_save()
        .with_post_destroy()
        .with_pre_destroy()
}

/// Helper building a store over a fresh observer and in-memory index
fn create_test_store(index: Arc<InMemoryIndex>) -> (LifecycleObserver, SyncedStore<Article>) {
    let observer = LifecycleObserver::new(index);
    let binding = observer.attach(article_descriptor());
    let store = SyncedStore::new(binding);
    (observer, store)
}

/// Index client whose upsert always fails, counting attempts
#[derive(Default)]
struct FailingIndex {
    upsert_attempts: AtomicUsize,
}

#[async_trait]
impl IndexClient for FailingIndex {
    async fn upsert(&self, _identity: &str, _document: &Document) -> IndexResult<Ack> {
        self.upsert_attempts.fetch_add(1, Ordering::SeqCst);
        Err(IndexError::Backend("index unavailable".to_string()))
    }

    async fn remove(&self, identity: &str) -> IndexResult<Ack> {
        Ok(Ack::new(identity, IndexOp::Remove))
    }
}

#[tokio::test]
async fn test_attach_is_conditional() {
    let index = Arc::new(InMemoryIndex::new());
    let observer = LifecycleObserver::new(index.clone());

    // No post-save/post-destroy support: attach registers nothing and never
    // fails the caller.
    let binding = observer.attach(ModelDescriptor::new("article"));
    assert!(binding.is_none());
    assert!(!observer.is_attached("article"));

    // An unmanaged store mutates freely with zero index traffic.
    let store: SyncedStore<Article> = SyncedStore::new(binding);
    store.save(Article::new("a-1", "quiet")).await.unwrap();
    store.delete("a-1").await.unwrap();

    assert_eq!(index.upsert_count(), 0);
    assert_eq!(index.remove_count(), 0);
}

#[tokio::test]
async fn test_attach_is_idempotent() {
    let index = Arc::new(InMemoryIndex::new());
    let observer = LifecycleObserver::new(index.clone());

    let _first = observer.attach(article_descriptor()).unwrap();
    let second = observer.attach(article_descriptor()).unwrap();

    let store = SyncedStore::new(Some(second));
    store.save(Article::new("a-1", "once")).await.unwrap();

    // One mutation, exactly one sync.
    assert_eq!(index.upsert_count(), 1);
}

#[tokio::test]
async fn test_create_triggers_upsert() {
    let index = Arc::new(InMemoryIndex::new());
    let (_observer, store) = create_test_store(index.clone());

    let outcome = store
        .save(Article::new("a-1", "first post"))
        .await
        .unwrap()
        .unwrap();

    assert!(matches!(outcome, SyncOutcome::Upserted { .. }));
    assert_eq!(index.upsert_count(), 1);
    assert_eq!(index.remove_count(), 0);
    assert_eq!(index.document("a-1").unwrap().body["title"], "first post");
}

#[tokio::test]
async fn test_update_triggers_upsert_with_new_state() {
    let index = Arc::new(InMemoryIndex::new());
    let (_observer, store) = create_test_store(index.clone());

    store.save(Article::new("a-1", "first post")).await.unwrap();
    store
        .save(Article::new("a-1", "first post, revised"))
        .await
        .unwrap();

    assert_eq!(index.upsert_count(), 2);
    assert_eq!(index.remove_count(), 0);
    assert_eq!(index.document_count(), 1);
    assert_eq!(
        index.document("a-1").unwrap().body["title"],
        "first post, revised"
    );
}

#[tokio::test]
async fn test_delete_triggers_remove() {
    let index = Arc::new(InMemoryIndex::new());
    let (_observer, store) = create_test_store(index.clone());

    store.save(Article::new("a-1", "short-lived")).await.unwrap();
    let outcome = store.delete("a-1").await.unwrap().unwrap();

    assert!(matches!(outcome, SyncOutcome::Removed { .. }));
    assert_eq!(index.upsert_count(), 1); // only the save
    assert_eq!(index.remove_count(), 1);
    assert_eq!(index.document_count(), 0);
}

#[tokio::test]
async fn test_deletion_flag_fallback() {
    let index = Arc::new(InMemoryIndex::new());
    let observer = LifecycleObserver::new(index);
    let binding = observer.attach(article_descriptor()).unwrap();

    let tracked = binding.track(Article::new("a-1", "doomed"));
    assert!(!tracked.is_deleted());

    binding.before_destroy(&tracked);
    assert!(tracked.is_deleted());
}

#[tokio::test]
async fn test_extension_ordering() {
    let index = Arc::new(InMemoryIndex::new());
    let (observer, store) = create_test_store(index);

    let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let order_a = Arc::clone(&order);
    observer.before_sync(move |_event| {
        order_a.lock().unwrap().push("A");
        Ok(())
    });

    let order_b = Arc::clone(&order);
    observer.before_sync(move |_event| {
        order_b.lock().unwrap().push("B");
        Ok(())
    });

    store.save(Article::new("a-1", "ordered")).await.unwrap();
    store.save(Article::new("a-1", "ordered again")).await.unwrap();

    // A runs before B on every sync.
    assert_eq!(*order.lock().unwrap(), vec!["A", "B", "A", "B"]);
}

#[tokio::test]
async fn test_extensions_see_sync_view_and_outcome() {
    let index = Arc::new(InMemoryIndex::new());
    let (observer, store) = create_test_store(index);

    let seen: Arc<Mutex<Vec<(String, String, bool)>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_after = Arc::clone(&seen);
    observer.after_sync(move |event, outcome| {
        seen_after.lock().unwrap().push((
            event.identity.to_string(),
            outcome.op().to_string(),
            outcome.is_failure(),
        ));
        Ok(())
    });

    store.save(Article::new("a-1", "observed")).await.unwrap();
    store.delete("a-1").await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            ("a-1".to_string(), "Upsert".to_string(), false),
            ("a-1".to_string(), "Remove".to_string(), false),
        ]
    );
}

#[tokio::test]
async fn test_index_failure_propagates_without_retry() {
    let failing = Arc::new(FailingIndex::default());
    let observer = LifecycleObserver::new(failing.clone());
    let binding = observer.attach(article_descriptor());
    let store = SyncedStore::new(binding);

    let failures_seen = Arc::new(AtomicUsize::new(0));
    let failures = Arc::clone(&failures_seen);
    observer.after_sync(move |_event, outcome| {
        if outcome.is_failure() {
            failures.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    });

    // The save that triggered the sync is reported as failed to its caller.
    let err = store
        .save(Article::new("a-1", "unreachable"))
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Index(_)));

    // Exactly one attempt; no automatic retry.
    assert_eq!(failing.upsert_attempts.load(Ordering::SeqCst), 1);

    // after_sync extensions observed the failed outcome before propagation.
    assert_eq!(failures_seen.load(Ordering::SeqCst), 1);

    // The primary write committed; the divergence is the caller's to reconcile.
    assert!(store.contains("a-1"));
}

#[tokio::test]
async fn test_failing_extension_aborts_remaining_extensions() {
    let index = Arc::new(InMemoryIndex::new());
    let (observer, store) = create_test_store(index.clone());

    let later_ran = Arc::new(AtomicUsize::new(0));

    observer.before_sync(|_event| Err(ExtensionError::new("boom")));
    let later = Arc::clone(&later_ran);
    observer.before_sync(move |_event| {
        later.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let err = store.save(Article::new("a-1", "blocked")).await.unwrap_err();
    assert!(matches!(err, SyncError::Extension { .. }));

    // First failure propagates: the later extension and the index call are
    // both skipped.
    assert_eq!(later_ran.load(Ordering::SeqCst), 0);
    assert_eq!(index.upsert_count(), 0);
}

#[tokio::test]
async fn test_native_deletion_query_is_preferred() {
    #[derive(Clone)]
    struct SoftDeleted {
        id: String,
        removed: bool,
    }

    impl ManagedEntity for SoftDeleted {
        fn identity(&self) -> String {
            self.id.clone()
        }

        fn to_document(&self) -> Document {
            Document::new(self.id.clone(), json!({}))
        }

        fn deleted(&self) -> Option<bool> {
            Some(self.removed)
        }
    }

    let index = Arc::new(InMemoryIndex::new());
    let observer = LifecycleObserver::new(index.clone());
    let binding = observer
        .attach(article_descriptor().with_native_deletion_query())
        .unwrap();

    let entity = SoftDeleted {
        id: "s-1".to_string(),
        removed: true,
    };
    let tracked = binding.track(entity);

    // Classified by the native query, not the flag.
    assert!(tracked.is_deleted());
    let outcome = binding.after_destroy(&tracked).await.unwrap();
    assert!(matches!(outcome, SyncOutcome::Removed { .. }));
    assert_eq!(index.remove_count(), 1);
}

#[tokio::test]
async fn test_end_to_end_with_tantivy_backend() {
    let temp_dir = TempDir::new().unwrap();
    let index = Arc::new(TantivyIndex::open(temp_dir.path()).unwrap());

    let observer = LifecycleObserver::new(index.clone());
    let binding = observer.attach(article_descriptor());
    let store = SyncedStore::new(binding);

    store
        .save(Article::new("a-1", "postgres connection pooling"))
        .await
        .unwrap();
    store
        .save(Article::new("a-2", "redis eviction policies"))
        .await
        .unwrap();

    let hits = index.search("postgres", 10).unwrap();
    assert_eq!(hits, vec!["a-1".to_string()]);

    // Update re-indexes the new state under the same identity.
    store
        .save(Article::new("a-1", "mysql connection pooling"))
        .await
        .unwrap();
    assert!(index.search("postgres", 10).unwrap().is_empty());
    assert_eq!(index.search("mysql", 10).unwrap(), vec!["a-1".to_string()]);

    // Delete removes the document.
    store.delete("a-1").await.unwrap();
    assert!(index.search("mysql", 10).unwrap().is_empty());
    assert_eq!(index.stats().unwrap().total_documents, 1);
}
