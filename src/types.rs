//! Core SCORM types: revisions, data-model keys, and typed values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScormError;

// =========================================================================
// Revisions
// =========================================================================

/// Which revision of the runtime contract the host exposes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ScormVersion {
    #[serde(rename = "1.2")]
    Scorm12,
    #[serde(rename = "2004")]
    Scorm2004,
}

/// Literal method names a host object exposes for one revision.
#[derive(Debug, PartialEq, Eq)]
pub struct ApiMethods {
    pub initialize: &'static str,
    pub finish: &'static str,
    pub get_value: &'static str,
    pub set_value: &'static str,
    pub commit: &'static str,
    pub get_last_error: &'static str,
    pub get_error_string: &'static str,
    pub get_diagnostic: &'static str,
}

static SCORM_12_METHODS: ApiMethods = ApiMethods {
    initialize: "LMSInitialize",
    finish: "LMSFinish",
    get_value: "LMSGetValue",
    set_value: "LMSSetValue",
    commit: "LMSCommit",
    get_last_error: "LMSGetLastError",
    get_error_string: "LMSGetErrorString",
    get_diagnostic: "LMSGetDiagnostic",
};

static SCORM_2004_METHODS: ApiMethods = ApiMethods {
    initialize: "Initialize",
    finish: "Terminate",
    get_value: "GetValue",
    set_value: "SetValue",
    commit: "Commit",
    get_last_error: "GetLastError",
    get_error_string: "GetErrorString",
    get_diagnostic: "GetDiagnostic",
};

impl ScormVersion {
    /// Version tag as the host and configuration spell it ("1.2" / "2004")
    pub fn as_str(&self) -> &'static str {
        match self {
            ScormVersion::Scorm12 => "1.2",
            ScormVersion::Scorm2004 => "2004",
        }
    }

    /// Property name under which a browsing context exposes the host object
    pub fn api_object_name(&self) -> &'static str {
        match self {
            ScormVersion::Scorm12 => "API",
            ScormVersion::Scorm2004 => "API_1484_11",
        }
    }

    /// Lesson/completion status key
    pub fn status_key(&self) -> &'static str {
        match self {
            ScormVersion::Scorm12 => keys::LESSON_STATUS,
            ScormVersion::Scorm2004 => keys::COMPLETION_STATUS,
        }
    }

    /// Exit mode key
    pub fn exit_key(&self) -> &'static str {
        match self {
            ScormVersion::Scorm12 => keys::CORE_EXIT,
            ScormVersion::Scorm2004 => keys::EXIT,
        }
    }

    pub fn methods(&self) -> &'static ApiMethods {
        match self {
            ScormVersion::Scorm12 => &SCORM_12_METHODS,
            ScormVersion::Scorm2004 => &SCORM_2004_METHODS,
        }
    }
}

impl fmt::Display for ScormVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScormVersion {
    type Err = ScormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1.2" => Ok(ScormVersion::Scorm12),
            "2004" => Ok(ScormVersion::Scorm2004),
            other => Err(ScormError::Config(format!("unsupported SCORM version: {}", other))),
        }
    }
}

/// Data-model keys the adapter touches directly.
pub mod keys {
    pub const LESSON_STATUS: &str = "cmi.core.lesson_status";
    pub const COMPLETION_STATUS: &str = "cmi.completion_status";
    pub const CORE_EXIT: &str = "cmi.core.exit";
    pub const EXIT: &str = "cmi.exit";
}

/// Status vocabulary read and written by the connection lifecycle.
pub mod status {
    pub const NOT_ATTEMPTED: &str = "not attempted";
    pub const UNKNOWN: &str = "unknown";
    pub const INCOMPLETE: &str = "incomplete";
    pub const COMPLETED: &str = "completed";
    pub const PASSED: &str = "passed";
}

/// Exit value written on terminate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitMode {
    Suspend,
    Logout,
}

impl ExitMode {
    /// `logout` once the learner has completed or passed, `suspend` otherwise
    pub fn for_completion(completion_status: Option<&str>) -> Self {
        match completion_status {
            Some(status::COMPLETED) | Some(status::PASSED) => ExitMode::Logout,
            _ => ExitMode::Suspend,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExitMode::Suspend => "suspend",
            ExitMode::Logout => "logout",
        }
    }
}

// =========================================================================
// Connection state & cached status
// =========================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Inactive,
    Active,
}

impl ConnectionState {
    pub fn is_active(&self) -> bool {
        matches!(self, ConnectionState::Active)
    }
}

/// Status fields captured from successful reads of the status/exit keys
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CachedStatus {
    pub completion_status: Option<String>,
    pub exit_status: Option<String>,
}

impl CachedStatus {
    /// True when an exit value was read this session. Empty strings don't count.
    pub fn has_exit_status(&self) -> bool {
        self.exit_status.as_deref().is_some_and(|s| !s.is_empty())
    }
}

// =========================================================================
// Typed values
// =========================================================================

/// Adapter-facing value of a data-model element.
///
/// The host stores everything as text; reads are coerced with [`ScormValue::coerce`]
/// and writes go back through [`ScormValue::to_wire`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScormValue {
    Bool(bool),
    Number(f64),
    String(String),
}

/// Returned by reads that never reached the host
pub const NULL_SENTINEL: &str = "null";

impl ScormValue {
    /// Coerce host text: `true`/`false` first, then finite numbers, else the raw text.
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "true" => return ScormValue::Bool(true),
            "false" => return ScormValue::Bool(false),
            _ => {}
        }

        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            if let Ok(n) = trimmed.parse::<f64>() {
                if n.is_finite() {
                    return ScormValue::Number(n);
                }
            }
        }

        ScormValue::String(raw.to_string())
    }

    pub fn null_sentinel() -> Self {
        ScormValue::String(NULL_SENTINEL.to_string())
    }

    /// String form sent to the host
    pub fn to_wire(&self) -> String {
        self.to_string()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScormValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScormValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScormValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ScormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScormValue::Bool(b) => write!(f, "{}", b),
            ScormValue::Number(n) => write_js_number(f, *n),
            ScormValue::String(s) => f.write_str(s),
        }
    }
}

/// Number text as a browser host renders it: plain decimals for exponents
/// in `-7..21`, `1e+21` / `1.5e-7` style outside that range.
fn write_js_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("NaN");
    }
    if n.is_infinite() {
        return f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if n == 0.0 {
        return f.write_str("0");
    }

    let scientific = format!("{:e}", n);
    let parts = scientific
        .split_once('e')
        .and_then(|(mantissa, exp)| exp.parse::<i32>().ok().map(|exp| (mantissa, exp)));
    match parts {
        Some((mantissa, exp)) if !(-7..21).contains(&exp) => {
            let sign = if exp > 0 { "+" } else { "" };
            write!(f, "{}e{}{}", mantissa, sign, exp)
        }
        _ => write!(f, "{}", n),
    }
}

impl From<bool> for ScormValue {
    fn from(value: bool) -> Self {
        ScormValue::Bool(value)
    }
}

impl From<f64> for ScormValue {
    fn from(value: f64) -> Self {
        ScormValue::Number(value)
    }
}

impl From<i32> for ScormValue {
    fn from(value: i32) -> Self {
        ScormValue::Number(value as f64)
    }
}

impl From<u32> for ScormValue {
    fn from(value: u32) -> Self {
        ScormValue::Number(value as f64)
    }
}

impl From<&str> for ScormValue {
    fn from(value: &str) -> Self {
        ScormValue::String(value.to_string())
    }
}

impl From<String> for ScormValue {
    fn from(value: String) -> Self {
        ScormValue::String(value)
    }
}

impl From<ExitMode> for ScormValue {
    fn from(value: ExitMode) -> Self {
        ScormValue::String(value.as_str().to_string())
    }
}
