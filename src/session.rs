//! Session context shared by the adapter's components.

use crate::config::AdapterConfig;
use crate::host::{ContextRef, RuntimeHandle};
use crate::types::{CachedStatus, ConnectionState, ScormVersion};

/// Discovery's private state: where to start looking and what was found.
pub(crate) struct ApiState {
    pub(crate) root: ContextRef,
    pub(crate) handle: Option<RuntimeHandle>,
    pub(crate) found: bool,
    pub(crate) last_attempts: u32,
}

/// Everything one adapter session knows.
///
/// Owned by [`ScormAdapter`](crate::ScormAdapter); each component borrows it
/// mutably for the length of one operation.
pub struct SessionContext {
    pub(crate) config: AdapterConfig,
    pub(crate) version: Option<ScormVersion>,
    pub(crate) api: ApiState,
    pub(crate) state: ConnectionState,
    pub(crate) status: CachedStatus,
}

impl SessionContext {
    pub fn new(root: ContextRef, config: AdapterConfig) -> Self {
        Self {
            version: config.version,
            config,
            api: ApiState {
                root,
                handle: None,
                found: false,
                last_attempts: 0,
            },
            state: ConnectionState::Inactive,
            status: CachedStatus::default(),
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Resolved revision, if one was configured or discovered
    pub fn version(&self) -> Option<ScormVersion> {
        self.version
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn cached_status(&self) -> &CachedStatus {
        &self.status
    }

    /// Whether a runtime handle has been located
    pub fn is_available(&self) -> bool {
        self.api.handle.is_some()
    }
}
