//! Observer configuration

use serde::{Deserialize, Serialize};

/// Lifecycle observer configuration
///
/// The observer degrades silently by design when a model type lacks the hooks
/// it needs; these switches control whether the degradations are observable
/// through tracing. Both default to on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Emit a debug diagnostic when `attach` no-ops on a model type without
    /// post-save/post-destroy support
    pub log_unmanaged_models: bool,

    /// Emit a warning when a model type supports neither a native deletion
    /// query nor a pre-destroy hook, so its entities always classify as live
    pub warn_on_degraded_deletion: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            log_unmanaged_models: true,
            warn_on_degraded_deletion: true,
        }
    }
}

/// Builder for SyncConfig
pub struct SyncConfigBuilder {
    config: SyncConfig,
}

impl SyncConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SyncConfig::default(),
        }
    }

    pub fn log_unmanaged_models(mut self, enabled: bool) -> Self {
        self.config.log_unmanaged_models = enabled;
        self
    }

    pub fn warn_on_degraded_deletion(mut self, enabled: bool) -> Self {
        self.config.warn_on_degraded_deletion = enabled;
        self
    }

    pub fn build(self) -> SyncConfig {
        self.config
    }
}

impl Default for SyncConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
