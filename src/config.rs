//! Adapter configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::ScormVersion;

/// Default bound on parent hops per discovery walk
pub const DEFAULT_FIND_ATTEMPT_LIMIT: u32 = 500;

/// Options recognized when constructing an adapter.
///
/// JSON form uses camelCase keys so content can pass the same object it would
/// hand a script wrapper: `{"version": "2004", "autoHandleExitMode": false}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdapterConfig {
    /// Pin the revision, or leave unset to take whichever shape the host exposes
    pub version: Option<ScormVersion>,
    /// Repair a `not attempted`/`unknown` status to `incomplete` on initialize
    pub auto_handle_completion_status: bool,
    /// Write `suspend`/`logout` to the exit key on terminate
    pub auto_handle_exit_mode: bool,
    pub find_attempt_limit: u32,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            version: None,
            auto_handle_completion_status: true,
            auto_handle_exit_mode: true,
            find_attempt_limit: DEFAULT_FIND_ATTEMPT_LIMIT,
        }
    }
}

impl AdapterConfig {
    /// Parse config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_version(mut self, version: ScormVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_completion_status_handling(mut self, enabled: bool) -> Self {
        self.auto_handle_completion_status = enabled;
        self
    }

    pub fn with_exit_mode_handling(mut self, enabled: bool) -> Self {
        self.auto_handle_exit_mode = enabled;
        self
    }

    pub fn with_find_attempt_limit(mut self, limit: u32) -> Self {
        self.find_attempt_limit = limit;
        self
    }
}
