//! Adapter facade: the flat call surface content talks to.

use tracing::error;

use crate::config::AdapterConfig;
use crate::connection::Connection;
use crate::data::DataStore;
use crate::diagnostics::Diagnostics;
use crate::discovery::Discovery;
use crate::host::ContextRef;
use crate::session::SessionContext;
use crate::types::{CachedStatus, ScormValue, ScormVersion};

/// One SCORM session for one piece of content.
///
/// Every operation returns a plain success flag or value; failures are
/// reported on the tracing channel. Use the component accessors
/// ([`connection`](Self::connection), [`data`](Self::data), ...) for the
/// `Result`-returning variants.
pub struct ScormAdapter {
    session: SessionContext,
}

impl ScormAdapter {
    /// Create an adapter that looks for the host starting at `root`.
    pub fn new(root: ContextRef, config: AdapterConfig) -> Self {
        Self {
            session: SessionContext::new(root, config),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn connection(&mut self) -> Connection<'_> {
        Connection::new(&mut self.session)
    }

    pub fn data(&mut self) -> DataStore<'_> {
        DataStore::new(&mut self.session)
    }

    pub fn diagnostics(&mut self) -> Diagnostics<'_> {
        Diagnostics::new(&mut self.session)
    }

    pub fn discovery(&mut self) -> Discovery<'_> {
        Discovery::new(&mut self.session)
    }

    pub fn initialize(&mut self) -> bool {
        self.connection().initialize()
    }

    pub fn terminate(&mut self) -> bool {
        self.connection().terminate()
    }

    pub fn is_connected(&self) -> bool {
        self.session.state().is_active()
    }

    /// Whether the host runtime object has been located
    pub fn is_available(&self) -> bool {
        self.session.is_available()
    }

    pub fn version(&self) -> Option<ScormVersion> {
        self.session.version()
    }

    pub fn cached_status(&self) -> &CachedStatus {
        self.session.cached_status()
    }

    pub fn get_value(&mut self, key: &str) -> ScormValue {
        self.data().get(key)
    }

    pub fn set_value(&mut self, key: &str, value: impl Into<ScormValue>) -> bool {
        self.data().set(key, &value.into())
    }

    pub fn save(&mut self) -> bool {
        self.data().save()
    }

    pub fn get_status(&mut self) -> ScormValue {
        self.data().status("get", None)
    }

    pub fn set_status(&mut self, status: &str) -> bool {
        self.data().status("set", Some(status)) == ScormValue::Bool(true)
    }

    /// Status by action name, `"get"` or `"set"`
    pub fn handle_status(&mut self, action: &str, status: Option<&str>) -> ScormValue {
        self.data().status(action, status)
    }

    pub fn last_error_code(&mut self) -> u32 {
        self.diagnostics().code()
    }

    pub fn error_text(&mut self, code: u32) -> String {
        self.diagnostics().info(code)
    }

    pub fn diagnostic_text(&mut self, code: u32) -> String {
        self.diagnostics().diagnostic_info(code)
    }

    /// Report a failure detected by the calling content itself.
    pub fn report_error(&self, action: &str, message: &str) {
        error!(action, "{} failed: {}", action, message);
    }
}
