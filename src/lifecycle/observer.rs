use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::SyncConfig;
use crate::error::{ExtensionError, ExtensionStage, SyncError, SyncResult};
use crate::index::IndexClient;
use crate::lifecycle::{DeletionDetection, DeletionStateTracker, ModelDescriptor, Tracked};
use crate::models::{IndexOp, LifecycleEvent, ManagedEntity, SyncEvent, SyncOutcome};

/// Extension run before every index call
pub type BeforeSyncFn =
    dyn Fn(&SyncEvent<'_>) -> Result<(), ExtensionError> + Send + Sync + 'static;

/// Extension run after every index call, with its outcome
pub type AfterSyncFn =
    dyn Fn(&SyncEvent<'_>, &SyncOutcome) -> Result<(), ExtensionError> + Send + Sync + 'static;

#[derive(Clone)]
struct ModelRegistration {
    descriptor: ModelDescriptor,
    detection: DeletionDetection,
}

struct ObserverInner {
    client: Arc<dyn IndexClient>,
    config: SyncConfig,
    models: DashMap<String, ModelRegistration>,
    before: RwLock<Vec<Box<BeforeSyncFn>>>,
    after: RwLock<Vec<Box<AfterSyncFn>>>,
}

/// Observes model lifecycles and keeps the external index synchronized
///
/// Model types opt in through [`attach`](LifecycleObserver::attach); the
/// returned [`ModelBinding`] is the hook surface the host wires into its
/// mutation path. Synchronization runs inline on the task performing the
/// mutation — there is no background queue, and an index failure surfaces as a
/// failure of the save/delete that triggered it.
#[derive(Clone)]
pub struct LifecycleObserver {
    inner: Arc<ObserverInner>,
}

impl LifecycleObserver {
    pub fn new(client: Arc<dyn IndexClient>) -> Self {
        Self::with_config(client, SyncConfig::default())
    }

    pub fn with_config(client: Arc<dyn IndexClient>, config: SyncConfig) -> Self {
        Self {
            inner: Arc::new(ObserverInner {
                client,
                config,
                models: DashMap::new(),
                before: RwLock::new(Vec::new()),
                after: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Opt a model type in
    ///
    /// Registers the hook bindings iff the descriptor reports post-save and
    /// post-destroy support; otherwise returns `None` and the type stays
    /// unmanaged — never an error. Idempotent: attaching the same model name
    /// twice yields a binding over the original registration, so each mutation
    /// still triggers exactly one sync.
    pub fn attach(&self, descriptor: ModelDescriptor) -> Option<ModelBinding> {
        if !descriptor.supports_sync() {
            if self.inner.config.log_unmanaged_models {
                tracing::debug!(
                    model = %descriptor.name,
                    "model lacks post-save/post-destroy support; left unmanaged"
                );
            }
            return None;
        }

        let name = descriptor.name.clone();
        let registration = self
            .inner
            .models
            .entry(name)
            .or_insert_with(|| {
                let detection =
                    DeletionStateTracker::ensure_capability(&descriptor, &self.inner.config);
                tracing::debug!(
                    model = %descriptor.name,
                    detection = %detection,
                    "model attached"
                );
                ModelRegistration {
                    descriptor,
                    detection,
                }
            })
            .clone();

        Some(ModelBinding {
            inner: Arc::clone(&self.inner),
            model: registration.descriptor.name,
            detection: registration.detection,
        })
    }

    /// Whether a model type is currently attached
    pub fn is_attached(&self, model: &str) -> bool {
        self.inner.models.contains_key(model)
    }

    /// Register a `before_sync` extension
    ///
    /// Extensions run in registration order before every index call, for every
    /// attached model. No isolation: the first failure skips the rest and
    /// aborts the sync.
    pub fn before_sync<F>(&self, extension: F)
    where
        F: Fn(&SyncEvent<'_>) -> Result<(), ExtensionError> + Send + Sync + 'static,
    {
        self.inner.before.write().push(Box::new(extension));
    }

    /// Register an `after_sync` extension
    ///
    /// Extensions run in registration order after every index call and observe
    /// its outcome, including failures. No isolation: the first failure skips
    /// the rest and propagates — though an index failure still takes
    /// precedence as the returned error.
    pub fn after_sync<F>(&self, extension: F)
    where
        F: Fn(&SyncEvent<'_>, &SyncOutcome) -> Result<(), ExtensionError> + Send + Sync + 'static,
    {
        self.inner.after.write().push(Box::new(extension));
    }
}

/// Hook surface for one attached model type
///
/// Cheap to clone; all clones share the observer's client, extensions, and
/// registry.
#[derive(Clone)]
pub struct ModelBinding {
    inner: Arc<ObserverInner>,
    model: String,
    detection: DeletionDetection,
}

impl ModelBinding {
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn detection(&self) -> DeletionDetection {
        self.detection
    }

    /// Wrap an entity instance with this model's deletion detection
    pub fn track<E: ManagedEntity>(&self, entity: E) -> Tracked<E> {
        Tracked::new(entity, self.detection)
    }

    /// Pre-destroy hook: record deletion intent before the primary delete
    /// commits
    ///
    /// Only meaningful in flag-backed detection mode; a native capability is
    /// never overridden and an unsupported one cannot be patched.
    pub fn before_destroy<E: ManagedEntity>(&self, entity: &Tracked<E>) {
        if self.detection == DeletionDetection::Flagged {
            entity.mark_destroying();
            tracing::debug!(
                model = %self.model,
                identity = %entity.entity().identity(),
                "deletion intent recorded"
            );
        }
    }

    /// Post-save hook: synchronize after a create or update is committed
    pub async fn after_save<E: ManagedEntity>(
        &self,
        entity: &Tracked<E>,
        event: LifecycleEvent,
    ) -> SyncResult<SyncOutcome> {
        self.sync_index(entity, event).await
    }

    /// Post-destroy hook: synchronize after a delete is committed
    pub async fn after_destroy<E: ManagedEntity>(
        &self,
        entity: &Tracked<E>,
    ) -> SyncResult<SyncOutcome> {
        self.sync_index(entity, LifecycleEvent::Deleted).await
    }

    /// The single synchronization entry point
    ///
    /// Runs the before extensions, issues exactly one index call classified by
    /// the entity's deletion state, runs the after extensions with the
    /// outcome, and returns it. Never retries; an index failure propagates to
    /// the caller after the after extensions have observed it.
    pub async fn sync_index<E: ManagedEntity>(
        &self,
        entity: &Tracked<E>,
        event: LifecycleEvent,
    ) -> SyncResult<SyncOutcome> {
        let identity = entity.entity().identity();
        let deleted = entity.is_deleted();
        let view = SyncEvent {
            model: &self.model,
            identity: &identity,
            event,
            deleted,
        };

        // Extension guards must not be held across the index await.
        {
            let before = self.inner.before.read();
            for extension in before.iter() {
                extension(&view).map_err(|e| SyncError::Extension {
                    stage: ExtensionStage::BeforeSync,
                    message: e.to_string(),
                })?;
            }
        }

        let (op, call) = if deleted {
            (IndexOp::Remove, self.inner.client.remove(&identity).await)
        } else {
            let document = entity.entity().to_document();
            (
                IndexOp::Upsert,
                self.inner.client.upsert(&identity, &document).await,
            )
        };

        let (outcome, index_failure) = match call {
            Ok(ack) => {
                tracing::debug!(
                    model = %self.model,
                    identity = %identity,
                    op = %op,
                    event = %event,
                    "index synchronized"
                );
                let outcome = match op {
                    IndexOp::Upsert => SyncOutcome::Upserted {
                        identity: identity.clone(),
                        ack,
                    },
                    IndexOp::Remove => SyncOutcome::Removed {
                        identity: identity.clone(),
                        ack,
                    },
                };
                (outcome, None)
            }
            Err(err) => {
                tracing::warn!(
                    model = %self.model,
                    identity = %identity,
                    op = %op,
                    error = %err,
                    "index sync failed"
                );
                let outcome = SyncOutcome::Failed {
                    identity: identity.clone(),
                    op,
                    message: err.to_string(),
                };
                (outcome, Some(err))
            }
        };

        let extension_failure = {
            let after = self.inner.after.read();
            let mut failure = None;
            for extension in after.iter() {
                if let Err(e) = extension(&view, &outcome) {
                    failure = Some(e);
                    break;
                }
            }
            failure
        };

        if let Some(err) = index_failure {
            return Err(SyncError::Index(err));
        }
        if let Some(err) = extension_failure {
            return Err(SyncError::Extension {
                stage: ExtensionStage::AfterSync,
                message: err.to_string(),
            });
        }

        Ok(outcome)
    }
}
