//! Runtime error types.

use webbridge_sdk::BridgeError;

/// Errors seen by script-side callers of the headless runtime.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The native side answered with a structured error
    #[error("{0}")]
    Call(#[from] BridgeError),

    /// The script thread could not be started
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Payload did not decode to the expected shape
    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// No function is bound under this name
    #[error("No binding named {0}")]
    MissingBinding(String),

    /// The class was never defined on the script side
    #[error("Class {0} is not defined")]
    UnknownClass(String),

    /// The proxy has no member of this kind
    #[error("{class} has no {kind} named {member}")]
    NoSuchMember {
        /// Class name
        class: String,
        /// Member name
        member: String,
        /// Member kind ("method", "property", ...)
        kind: &'static str,
    },

    /// The request was not answered in time
    #[error("Request {0} timed out")]
    Timeout(String),

    /// An async request was issued from the script thread itself
    #[error("Request {0} cannot complete on the script thread")]
    WouldBlock(String),

    /// The script thread is shut down
    #[error("Script thread is shut down")]
    Stopped,
}

impl RuntimeError {
    /// Structured bridge error, if this is one
    pub fn bridge_error(&self) -> Option<&BridgeError> {
        match self {
            RuntimeError::Call(err) => Some(err),
            _ => None,
        }
    }
}
