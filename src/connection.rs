//! Connection manager: the initialize/terminate lifecycle.
//!
//! ```text
//! Inactive --initialize--> Active --terminate--> Inactive
//! ```
//!
//! Misuse (initializing twice, terminating while inactive) fails before any
//! host call. Terminate short-circuits on the first failing sub-step: a
//! failed exit-mode write or commit leaves the connection active and the
//! host's finish operation uncalled.

use tracing::{debug, info, warn};

use crate::data::{DataStore, StatusAction};
use crate::diagnostics::{report, Diagnostics};
use crate::discovery::Discovery;
use crate::error::{Result, ScormError};
use crate::session::SessionContext;
use crate::types::{status, ConnectionState, ExitMode, ScormValue, ScormVersion};

const INITIALIZE: &str = "SCORM.connection.initialize";
const TERMINATE: &str = "SCORM.connection.terminate";

pub struct Connection<'s> {
    session: &'s mut SessionContext,
}

impl<'s> Connection<'s> {
    pub fn new(session: &'s mut SessionContext) -> Self {
        Self { session }
    }

    pub fn is_active(&self) -> bool {
        self.session.state.is_active()
    }

    /// Open the connection.
    ///
    /// The host's own acknowledgement is double-checked against its last
    /// error code, since some runtimes answer `"true"` and still flag an error.
    pub fn try_initialize(&mut self) -> Result<()> {
        if self.is_active() {
            return Err(ScormError::AlreadyActive);
        }

        let handle = Discovery::new(self.session).require()?;
        let acknowledged = handle.initialize();

        let mut diagnostics = Diagnostics::new(self.session);
        let code = diagnostics.code();
        if !acknowledged || code != 0 {
            return Err(diagnostics.failure(code));
        }

        self.session.state = ConnectionState::Active;
        info!(version = %handle.version(), "SCORM connection initialized");

        if self.session.config.auto_handle_completion_status {
            self.repair_completion_status();
        }
        Ok(())
    }

    pub fn initialize(&mut self) -> bool {
        debug!("{} called.", INITIALIZE);
        self.try_initialize()
            .map_err(|err| report(INITIALIZE, &err))
            .is_ok()
    }

    /// A fresh attempt reports `not attempted` or `unknown`; mark it `incomplete`
    /// and commit so the platform shows the content as started.
    fn repair_completion_status(&mut self) {
        let mut data = DataStore::new(self.session);
        let current = match data.try_status(StatusAction::Get, None) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "Could not read completion status after initialize");
                return;
            }
        };

        let needs_repair = matches!(
            &current,
            ScormValue::String(s) if s == status::NOT_ATTEMPTED || s == status::UNKNOWN
        );
        if !needs_repair {
            return;
        }

        debug!(from = %current, "Setting completion status to incomplete");
        let repaired = data
            .try_status(StatusAction::Set, Some(status::INCOMPLETE))
            .and_then(|_| data.try_save());
        if let Err(err) = repaired {
            warn!(error = %err, "Could not repair completion status");
        }
    }

    /// Close the connection.
    pub fn try_terminate(&mut self) -> Result<()> {
        if !self.is_active() {
            return Err(ScormError::AlreadyInactive);
        }

        let handle = Discovery::new(self.session)
            .handle()
            .ok_or(ScormError::NullHandle)?;
        let version = handle.version();

        if self.session.config.auto_handle_exit_mode && !self.session.status.has_exit_status() {
            let exit = ExitMode::for_completion(self.session.status.completion_status.as_deref());
            debug!(exit = exit.as_str(), "Writing exit mode");
            DataStore::new(self.session).try_set(version.exit_key(), &ScormValue::from(exit))?;
        }

        // 1.2 runtimes only persist on an explicit commit
        if version == ScormVersion::Scorm12 {
            DataStore::new(self.session).try_save()?;
        }

        if !handle.finish() {
            return Err(Diagnostics::new(self.session).last_failure());
        }

        self.session.state = ConnectionState::Inactive;
        info!(version = %version, "SCORM connection terminated");
        Ok(())
    }

    pub fn terminate(&mut self) -> bool {
        debug!("{} called.", TERMINATE);
        self.try_terminate()
            .map_err(|err| report(TERMINATE, &err))
            .is_ok()
    }
}
