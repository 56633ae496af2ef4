use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::SyncConfig;
use crate::lifecycle::{DeletionDetection, ModelDescriptor};
use crate::models::ManagedEntity;

/// Decides how deletion is detected for a model type
///
/// Host model types that cannot be queried for "was this instance destroyed"
/// after the record is physically gone get a flag-backed fallback, recorded on
/// the [`Tracked`] adapter by the pre-destroy hook. A native capability is
/// never overridden.
pub struct DeletionStateTracker;

impl DeletionStateTracker {
    /// Inspect the descriptor and pick the detection mode
    pub fn ensure_capability(
        descriptor: &ModelDescriptor,
        config: &SyncConfig,
    ) -> DeletionDetection {
        if descriptor.native_deletion_query {
            return DeletionDetection::Native;
        }

        if descriptor.hooks.pre_destroy {
            tracing::debug!(
                model = %descriptor.name,
                "no native deletion query; using flag-backed deletion detection"
            );
            return DeletionDetection::Flagged;
        }

        if config.warn_on_degraded_deletion {
            tracing::warn!(
                model = %descriptor.name,
                "no deletion detection available; entities will always classify as live"
            );
        }
        DeletionDetection::Unsupported
    }
}

/// Adapter carrying deletion state alongside an entity instance
///
/// Exposes a uniform [`is_deleted`](Tracked::is_deleted) regardless of whether
/// the underlying type supports a native deletion query. The flag transitions
/// one way only (`mark_destroying` never unsets it); an instance, once flagged,
/// stays flagged for the remainder of its in-memory lifetime, which spans
/// exactly one deletion transaction.
pub struct Tracked<E> {
    entity: E,
    detection: DeletionDetection,
    destroying: AtomicBool,
}

impl<E: ManagedEntity> Tracked<E> {
    pub fn new(entity: E, detection: DeletionDetection) -> Self {
        Self {
            entity,
            detection,
            destroying: AtomicBool::new(false),
        }
    }

    /// The wrapped entity
    pub fn entity(&self) -> &E {
        &self.entity
    }

    pub fn into_inner(self) -> E {
        self.entity
    }

    pub fn detection(&self) -> DeletionDetection {
        self.detection
    }

    /// Record deletion intent; called by the pre-destroy hook before the
    /// primary delete commits
    pub fn mark_destroying(&self) {
        // Only the task executing this instance's delete touches the flag.
        self.destroying.store(true, Ordering::Release);
    }

    /// Uniform deletion classification
    pub fn is_deleted(&self) -> bool {
        match self.detection {
            DeletionDetection::Native => self.entity.deleted().unwrap_or(false),
            DeletionDetection::Flagged => self.destroying.load(Ordering::Acquire),
            DeletionDetection::Unsupported => false,
        }
    }
}
