use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::index::Ack;

/// Lifecycle transition that triggered a synchronization attempt
///
/// Exists only as the momentary trigger passed from the host's mutation
/// machinery into the sync action; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum LifecycleEvent {
    Created,
    Updated,
    Deleted,
}

/// Index-mutating operation issued by a sync attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum IndexOp {
    Upsert,
    Remove,
}

/// Result of one synchronization attempt
///
/// Surfaced to `after_sync` extensions and returned to the caller. A `Failed`
/// outcome is also followed by an error from `sync_index` itself, so the
/// original save/delete caller sees the failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SyncOutcome {
    /// Entity state was upserted into the index
    Upserted { identity: String, ack: Ack },

    /// Entity was removed from the index
    Removed { identity: String, ack: Ack },

    /// The index call failed; no retry is attempted
    Failed {
        identity: String,
        op: IndexOp,
        message: String,
    },
}

impl SyncOutcome {
    /// Identity of the entity this outcome concerns
    pub fn identity(&self) -> &str {
        match self {
            SyncOutcome::Upserted { identity, .. }
            | SyncOutcome::Removed { identity, .. }
            | SyncOutcome::Failed { identity, .. } => identity,
        }
    }

    /// Operation that was attempted
    pub fn op(&self) -> IndexOp {
        match self {
            SyncOutcome::Upserted { .. } => IndexOp::Upsert,
            SyncOutcome::Removed { .. } => IndexOp::Remove,
            SyncOutcome::Failed { op, .. } => *op,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SyncOutcome::Failed { .. })
    }
}

/// View of a sync attempt handed to extensions
///
/// Type-erased on purpose: extensions are registered once on the observer and
/// run for every attached model type.
#[derive(Debug, Clone, Copy)]
pub struct SyncEvent<'a> {
    /// Attached model type name
    pub model: &'a str,

    /// Entity identity
    pub identity: &'a str,

    /// Lifecycle transition that fired the hook
    pub event: LifecycleEvent,

    /// Deletion classification the sync will act on
    pub deleted: bool,
}
