//! In-memory host store wired to the lifecycle observer
//!
//! Demonstrates the intended integration: the primary mutation commits first,
//! then the binding's hooks fire on the same task, and a sync failure is
//! visible as a failure of the save/delete call itself.

use dashmap::DashMap;
use std::sync::Arc;

use crate::error::{SyncError, SyncResult};
use crate::lifecycle::ModelBinding;
use crate::models::{LifecycleEvent, ManagedEntity, SyncOutcome};

/// In-memory entity store with lifecycle-driven index synchronization
///
/// A store built without a binding persists entities but produces no index
/// traffic — the unmanaged case.
#[derive(Clone)]
pub struct SyncedStore<E> {
    entities: Arc<DashMap<String, E>>,
    binding: Option<ModelBinding>,
}

impl<E: ManagedEntity + Clone> SyncedStore<E> {
    pub fn new(binding: Option<ModelBinding>) -> Self {
        Self {
            entities: Arc::new(DashMap::new()),
            binding,
        }
    }

    /// Store without index synchronization
    pub fn unmanaged() -> Self {
        Self::new(None)
    }

    /// Persist an entity, then synchronize the index
    ///
    /// A fresh identity fires `Created`, an existing one `Updated`. The entity
    /// is committed to the store before the sync runs; if the sync fails the
    /// entity stays persisted and the error propagates, so the caller can
    /// detect the primary/index divergence.
    pub async fn save(&self, entity: E) -> SyncResult<Option<SyncOutcome>> {
        let identity = entity.identity();
        let previous = self.entities.insert(identity.clone(), entity.clone());
        let event = if previous.is_some() {
            LifecycleEvent::Updated
        } else {
            LifecycleEvent::Created
        };
        tracing::debug!(identity = %identity, event = %event, "entity saved");

        match &self.binding {
            Some(binding) => {
                let tracked = binding.track(entity);
                Ok(Some(binding.after_save(&tracked, event).await?))
            }
            None => Ok(None),
        }
    }

    /// Delete an entity, then synchronize the index
    ///
    /// Fires the pre-destroy hook before the record is removed, so flag-backed
    /// deletion detection classifies correctly even though the record is gone
    /// by the time the post-destroy sync runs.
    pub async fn delete(&self, identity: &str) -> SyncResult<Option<SyncOutcome>> {
        let entity = self
            .entities
            .get(identity)
            .map(|entry| entry.clone())
            .ok_or_else(|| SyncError::NotFound(format!("entity {} not found", identity)))?;

        match &self.binding {
            Some(binding) => {
                let tracked = binding.track(entity);
                binding.before_destroy(&tracked);
                self.entities.remove(identity);
                tracing::debug!(identity = %identity, "entity deleted");
                Ok(Some(binding.after_destroy(&tracked).await?))
            }
            None => {
                self.entities.remove(identity);
                tracing::debug!(identity = %identity, "entity deleted");
                Ok(None)
            }
        }
    }

    pub fn get(&self, identity: &str) -> Option<E> {
        self.entities.get(identity).map(|entry| entry.clone())
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.entities.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
