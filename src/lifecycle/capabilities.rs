use serde::{Deserialize, Serialize};
use strum::Display;

/// Lifecycle hooks a model type can fire
///
/// The capability set is known statically at integration time; no runtime
/// probing is involved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookSupport {
    /// Fires after a save is committed to the primary store
    pub post_save: bool,

    /// Fires after a delete is committed
    pub post_destroy: bool,

    /// Fires before a delete is committed
    pub pre_destroy: bool,
}

/// Static capability record for a model type
///
/// Describes what the host's mutation machinery can do for a given type, so
/// the observer can decide whether the type is manageable at all and how
/// deletion will be detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model type name; registry key for attach idempotency
    pub name: String,

    /// Supported lifecycle hooks
    pub hooks: HookSupport,

    /// Whether instances natively answer "was this instance destroyed"
    pub native_deletion_query: bool,
}

impl ModelDescriptor {
    /// Descriptor with no capabilities; enable them with the `with_*` methods
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hooks: HookSupport::default(),
            native_deletion_query: false,
        }
    }

    /// Descriptor for a fully capable model type
    pub fn full(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hooks: HookSupport {
                post_save: true,
                post_destroy: true,
                pre_destroy: true,
            },
            native_deletion_query: true,
        }
    }

    pub fn with_post_save(mut self) -> Self {
        self.hooks.post_save = true;
        self
    }

    pub fn with_post_destroy(mut self) -> Self {
        self.hooks.post_destroy = true;
        self
    }

    pub fn with_pre_destroy(mut self) -> Self {
        self.hooks.pre_destroy = true;
        self
    }

    pub fn with_native_deletion_query(mut self) -> Self {
        self.native_deletion_query = true;
        self
    }

    /// Whether the type can be managed at all: synchronization requires
    /// post-save and post-destroy notification
    pub fn supports_sync(&self) -> bool {
        self.hooks.post_save && self.hooks.post_destroy
    }
}

/// How deletion is detected for an attached model type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum DeletionDetection {
    /// The type natively answers "was this instance destroyed"
    Native,

    /// Flag-backed fallback: a pre-destroy hook records deletion intent on the
    /// tracked instance
    Flagged,

    /// Neither native query nor pre-destroy hook; entities always classify as
    /// live. Accepted degradation.
    Unsupported,
}
