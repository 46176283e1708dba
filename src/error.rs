//! Error types for the SCORM adapter

use thiserror::Error;

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, ScormError>;

/// Why an adapter operation did not go through.
///
/// The flat adapter surface never returns these; it reports them on the
/// tracing channel and hands back a boolean or sentinel instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScormError {
    /// No host object within the hop bound on any lookup path
    #[error("Can't find the API. Find attempts: {attempts}. Find attempt limit: {limit}")]
    DiscoveryFailure { attempts: u32, limit: u32 },

    #[error("Aborted: Connection already active.")]
    AlreadyActive,

    #[error("Connection already terminated.")]
    AlreadyInactive,

    /// Data operation attempted outside an active connection
    #[error("API connection is inactive.")]
    NotConnected,

    #[error("API is null.")]
    NullHandle,

    /// Host acknowledged nothing and reported no error code
    #[error("No response from server.")]
    NoResponse,

    /// Host refused the call or flagged an error code after acknowledging it
    #[error("API failure. Error code: {code} Error info: {info}")]
    HostRejection {
        code: u32,
        info: String,
        diagnostic: String,
    },

    #[error("No valid SCORM version was specified.")]
    UnresolvedVersion,

    #[error("No valid action was specified: {0}")]
    InvalidStatusAction(String),

    #[error("Status was not specified.")]
    MissingStatusValue,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScormError {
    /// Host error code carried by this error, 0 when none applies
    pub fn code(&self) -> u32 {
        match self {
            ScormError::HostRejection { code, .. } => *code,
            _ => 0,
        }
    }
}

impl From<serde_json::Error> for ScormError {
    fn from(err: serde_json::Error) -> Self {
        ScormError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message_carries_code_and_text() {
        let err = ScormError::HostRejection {
            code: 101,
            info: "General exception".into(),
            diagnostic: String::new(),
        };
        let message = err.to_string();
        assert!(message.contains("101"));
        assert!(message.contains("General exception"));
        assert_eq!(err.code(), 101);
        assert_eq!(ScormError::NoResponse.code(), 0);
    }

    #[test]
    fn test_discovery_message_carries_hops() {
        let err = ScormError::DiscoveryFailure { attempts: 500, limit: 500 };
        assert!(err.to_string().contains("Find attempts: 500"));
    }
}
