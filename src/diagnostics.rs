//! Diagnostics reporter: host error codes and their descriptions.

use tracing::{debug, error};

use crate::discovery::Discovery;
use crate::error::ScormError;
use crate::session::SessionContext;

/// Read-only view of the host's error state.
///
/// None of these calls need an active connection, and none of them change
/// anything on the host, so repeating one yields the same answer.
pub struct Diagnostics<'s> {
    session: &'s mut SessionContext,
}

impl<'s> Diagnostics<'s> {
    pub fn new(session: &'s mut SessionContext) -> Self {
        Self { session }
    }

    /// Host's last error code, 0 when there is no handle or no error
    pub fn code(&mut self) -> u32 {
        debug!("SCORM.debug.getCode called.");
        match Discovery::new(self.session).handle() {
            Some(handle) => handle.last_error(),
            None => {
                error!(action = "SCORM.debug.getCode", "SCORM.debug.getCode failed: API is null.");
                0
            }
        }
    }

    /// Short description for `code`, empty when there is no handle
    pub fn info(&mut self, code: u32) -> String {
        debug!("SCORM.debug.getInfo called.");
        match Discovery::new(self.session).handle() {
            Some(handle) => handle.error_string(code),
            None => {
                error!(action = "SCORM.debug.getInfo", "SCORM.debug.getInfo failed: API is null.");
                String::new()
            }
        }
    }

    /// Vendor diagnostic text for `code`, empty when there is no handle
    pub fn diagnostic_info(&mut self, code: u32) -> String {
        debug!("SCORM.debug.getDiagnosticInfo called.");
        match Discovery::new(self.session).handle() {
            Some(handle) => handle.diagnostic(code),
            None => {
                error!(
                    action = "SCORM.debug.getDiagnosticInfo",
                    "SCORM.debug.getDiagnosticInfo failed: API is null."
                );
                String::new()
            }
        }
    }

    /// Classify a failed host call by its error code: 0 means the host never answered.
    pub fn failure(&mut self, code: u32) -> ScormError {
        if code == 0 {
            return ScormError::NoResponse;
        }
        ScormError::HostRejection {
            code,
            info: self.info(code),
            diagnostic: self.diagnostic_info(code),
        }
    }

    /// Fetch the last error code and classify it.
    pub fn last_failure(&mut self) -> ScormError {
        let code = self.code();
        self.failure(code)
    }
}

/// Emit a failed operation on the report channel.
pub fn report(action: &str, err: &ScormError) {
    match err {
        ScormError::HostRejection { code, info, diagnostic } => {
            error!(action, code, "{} failed: {}", action, err);
            if !diagnostic.is_empty() {
                error!(action, code, "Error code: {} Error info: {} Diagnostic: {}", code, info, diagnostic);
            }
        }
        _ => error!(action, "{} failed: {}", action, err),
    }
}
