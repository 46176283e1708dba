//! Data store: typed reads and writes against the host data model.
//!
//! The host keeps every element as text. Reads are coerced into
//! [`ScormValue`]s, writes are stringified first. Successful reads of the
//! status and exit keys are mirrored into the session's [`CachedStatus`] so
//! the connection lifecycle can consult them without another round trip.
//!
//! [`CachedStatus`]: crate::types::CachedStatus

use tracing::debug;

use crate::diagnostics::{report, Diagnostics};
use crate::discovery::Discovery;
use crate::error::{Result, ScormError};
use crate::host::RuntimeHandle;
use crate::session::SessionContext;
use crate::types::ScormValue;

/// What a status call should do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusAction {
    Get,
    Set,
}

impl std::str::FromStr for StatusAction {
    type Err = ScormError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "get" => Ok(StatusAction::Get),
            "set" => Ok(StatusAction::Set),
            other => Err(ScormError::InvalidStatusAction(other.to_string())),
        }
    }
}

pub struct DataStore<'s> {
    session: &'s mut SessionContext,
}

impl<'s> DataStore<'s> {
    pub fn new(session: &'s mut SessionContext) -> Self {
        Self { session }
    }

    /// Handle for a data operation. Never contacts the host while inactive.
    fn gate(&mut self) -> Result<RuntimeHandle> {
        if !self.session.state.is_active() {
            return Err(ScormError::NotConnected);
        }
        Discovery::new(self.session).handle().ok_or(ScormError::NullHandle)
    }

    /// Read `key` and coerce it.
    ///
    /// An empty string is a valid value as long as the host reports no error.
    pub fn try_get(&mut self, key: &str) -> Result<ScormValue> {
        let handle = self.gate()?;
        let raw = handle.get_value(key);
        let code = Diagnostics::new(self.session).code();

        if raw.is_empty() && code != 0 {
            return Err(Diagnostics::new(self.session).failure(code));
        }

        if handle.is_status_key(key) {
            self.session.status.completion_status = Some(raw.clone());
        } else if handle.is_exit_key(key) {
            self.session.status.exit_status = Some(raw.clone());
        }

        debug!(key, value = %raw, "SCORM.data.get value");
        Ok(ScormValue::coerce(&raw))
    }

    /// Read `key`, reporting failures.
    ///
    /// Returns the `"null"` sentinel when the host was never asked, and the
    /// empty string when the host refused.
    pub fn get(&mut self, key: &str) -> ScormValue {
        let action = format!("SCORM.data.get('{}')", key);
        debug!("{} called.", action);

        match self.try_get(key) {
            Ok(value) => value,
            Err(err) => {
                report(&action, &err);
                match err {
                    ScormError::NotConnected | ScormError::NullHandle => ScormValue::null_sentinel(),
                    _ => ScormValue::String(String::new()),
                }
            }
        }
    }

    /// Write `value` to `key` in its string form.
    pub fn try_set(&mut self, key: &str, value: &ScormValue) -> Result<()> {
        let handle = self.gate()?;
        let wire = value.to_wire();

        if !handle.set_value(key, &wire) {
            return Err(Diagnostics::new(self.session).last_failure());
        }

        if handle.is_status_key(key) {
            self.session.status.completion_status = Some(wire.clone());
        }
        debug!(key, value = %wire, "SCORM.data.set value");
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &ScormValue) -> bool {
        let action = format!("SCORM.data.set('{}')", key);
        debug!("{} called.", action);

        self.try_set(key, value)
            .map_err(|err| report(&action, &err))
            .is_ok()
    }

    /// Ask the host to persist what has been set so far.
    pub fn try_save(&mut self) -> Result<()> {
        let handle = self.gate()?;
        if !handle.commit() {
            return Err(Diagnostics::new(self.session).last_failure());
        }
        Ok(())
    }

    pub fn save(&mut self) -> bool {
        debug!("SCORM.data.save called.");
        self.try_save()
            .map_err(|err| report("SCORM.data.save", &err))
            .is_ok()
    }

    /// Status key for the session's revision
    pub fn status_key(&self) -> Result<&'static str> {
        self.session
            .version
            .map(|v| v.status_key())
            .ok_or(ScormError::UnresolvedVersion)
    }

    /// Get or set the lesson/completion status.
    ///
    /// `Get` yields the coerced status, `Set` yields `Bool` success.
    pub fn try_status(&mut self, action: StatusAction, value: Option<&str>) -> Result<ScormValue> {
        let key = self.status_key()?;
        match action {
            StatusAction::Get => self.try_get(key),
            StatusAction::Set => {
                let value = value
                    .filter(|v| !v.is_empty())
                    .ok_or(ScormError::MissingStatusValue)?;
                self.try_set(key, &ScormValue::from(value))?;
                Ok(ScormValue::Bool(true))
            }
        }
    }

    /// Status entry point taking the action by name (`"get"` or `"set"`).
    ///
    /// Local failures (unknown version, bad action, missing value) yield
    /// `Bool(false)` without touching the host.
    pub fn status(&mut self, action: &str, value: Option<&str>) -> ScormValue {
        const ACTION: &str = "SCORM.status";

        let key = match self.status_key() {
            Ok(key) => key,
            Err(err) => {
                report(ACTION, &err);
                return ScormValue::Bool(false);
            }
        };
        let action = match action.parse::<StatusAction>() {
            Ok(action) => action,
            Err(err) => {
                report(ACTION, &err);
                return ScormValue::Bool(false);
            }
        };

        match action {
            StatusAction::Get => self.get(key),
            StatusAction::Set => match value.filter(|v| !v.is_empty()) {
                Some(value) => ScormValue::Bool(self.set(key, &ScormValue::from(value))),
                None => {
                    report(ACTION, &ScormError::MissingStatusValue);
                    ScormValue::Bool(false)
                }
            },
        }
    }
}
