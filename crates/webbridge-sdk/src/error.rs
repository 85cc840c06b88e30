//! Structured error model shared by both sides of the bridge.
//!
//! Every failed call produces a [`BridgeError`], projected onto the wire as
//!
//! ```text
//! {"error": {"code": 4002, "message": "...", "origin": "javascript",
//!            "stack": null, "cpp_function": null}}
//! ```
//!
//! Codes are partitioned into disjoint bands so a caller can classify a fault
//! from the number alone:
//!
//! - `4000..=4999`: the script side sent malformed or mistyped data
//! - `5000..=5998`: the native callee failed while executing
//! - `5999`: unanticipated failure that matched neither of the above

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

// ============================================================================
// Error codes
// ============================================================================

/// Numeric error code carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(i32);

/// Which side of the boundary a code blames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorBand {
    /// Malformed or mistyped data from the script side
    Script,
    /// Failure inside the native callee
    Native,
    /// Unanticipated failure
    Unknown,
}

impl ErrorCode {
    // 4xxx: script side

    /// Invalid JSON syntax
    pub const JSON_PARSE: ErrorCode = ErrorCode(4001);
    /// Wrong JSON type (e.g. string instead of int)
    pub const JSON_TYPE: ErrorCode = ErrorCode(4002);
    /// Missing key or array index
    pub const JSON_ACCESS: ErrorCode = ErrorCode(4003);
    /// Invalid argument, including wrong arity
    pub const INVALID_ARGUMENT: ErrorCode = ErrorCode(4004);
    /// Handle does not resolve to a live object
    pub const OBJECT_NOT_FOUND: ErrorCode = ErrorCode(4005);
    /// Type name was never registered
    pub const UNKNOWN_TYPE: ErrorCode = ErrorCode(4006);
    /// Member name is not exposed by the type
    pub const UNKNOWN_MEMBER: ErrorCode = ErrorCode(4007);

    // 5xxx: native side

    /// Generic runtime failure
    pub const RUNTIME: ErrorCode = ErrorCode(5000);
    /// Network or connection failure
    pub const NETWORK: ErrorCode = ErrorCode(5001);
    /// File I/O failure
    pub const FILE: ErrorCode = ErrorCode(5002);
    /// Timeout
    pub const TIMEOUT: ErrorCode = ErrorCode(5003);
    /// Permission denied
    pub const PERMISSION: ErrorCode = ErrorCode(5004);
    /// First application-defined code
    pub const CUSTOM: ErrorCode = ErrorCode(5500);
    /// Unanticipated failure
    pub const UNKNOWN: ErrorCode = ErrorCode(5999);

    const SCRIPT_BAND: std::ops::RangeInclusive<i32> = 4000..=4999;
    const NATIVE_BAND: std::ops::RangeInclusive<i32> = 5000..=5998;

    /// Application-defined native code, `CUSTOM + offset`.
    ///
    /// Returns `None` when the result would leave the native band.
    pub fn custom(offset: i32) -> Option<ErrorCode> {
        let code = Self::CUSTOM.0.checked_add(offset)?;
        (offset >= 0 && Self::NATIVE_BAND.contains(&code)).then_some(ErrorCode(code))
    }

    /// Build a code from its raw value
    pub const fn from_i32(code: i32) -> Self {
        ErrorCode(code)
    }

    /// Raw numeric value
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Classify the code by band
    pub fn band(self) -> ErrorBand {
        if Self::SCRIPT_BAND.contains(&self.0) {
            ErrorBand::Script
        } else if Self::NATIVE_BAND.contains(&self.0) {
            ErrorBand::Native
        } else {
            ErrorBand::Unknown
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Origin
// ============================================================================

/// Side of the boundary an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorOrigin {
    /// Script side (bad arguments, bad handle, bad JSON)
    #[serde(rename = "javascript")]
    Script,
    /// Native side (the callee failed)
    #[serde(rename = "cpp")]
    Native,
    /// Origin unknown
    #[serde(rename = "unknown")]
    Unknown,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorOrigin::Script => "javascript",
            ErrorOrigin::Native => "cpp",
            ErrorOrigin::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

// ============================================================================
// BridgeError
// ============================================================================

/// Structured error value returned across the boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct BridgeError {
    /// Numeric code (see [`ErrorCode`])
    pub code: ErrorCode,
    /// Human-readable description
    pub message: String,
    /// Side the error came from
    pub origin: ErrorOrigin,
    /// Call stack text, when a hook attached one
    pub stack: Option<String>,
    /// Native function that failed, when known
    #[serde(rename = "cpp_function")]
    pub native_function: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct Envelope<E> {
    error: E,
}

impl BridgeError {
    /// Create an error with an explicit origin
    pub fn new(code: ErrorCode, message: impl Into<String>, origin: ErrorOrigin) -> Self {
        Self {
            code,
            message: message.into(),
            origin,
            stack: None,
            native_function: None,
        }
    }

    /// Script-origin error
    pub fn script(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message, ErrorOrigin::Script)
    }

    /// Native-origin error
    pub fn native(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message, ErrorOrigin::Native)
    }

    /// The catch-all "unknown error"
    pub fn unknown() -> Self {
        Self::new(ErrorCode::UNKNOWN, "Unknown error", ErrorOrigin::Unknown)
    }

    /// Map a JSON decoding failure to the script band.
    pub fn from_json(err: &serde_json::Error) -> Self {
        use serde_json::error::Category;

        let code = match err.classify() {
            Category::Syntax | Category::Eof => ErrorCode::JSON_PARSE,
            Category::Data => ErrorCode::JSON_TYPE,
            Category::Io => ErrorCode::INVALID_ARGUMENT,
        };
        Self::script(code, err.to_string())
    }

    /// Attach call stack text
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Attach the name of the native function that failed
    pub fn with_native_function(mut self, function: impl Into<String>) -> Self {
        self.native_function = Some(function.into());
        self
    }

    /// Override the origin
    pub fn with_origin(mut self, origin: ErrorOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Band of this error's code
    pub fn band(&self) -> ErrorBand {
        self.code.band()
    }

    /// `{"error": {...}}` as a JSON value
    pub fn to_json(&self) -> Value {
        serde_json::json!({ "error": self })
    }

    /// `{"error": {...}}` as a string
    pub fn dump(&self) -> String {
        self.to_json().to_string()
    }

    /// Parse an `{"error": {...}}` payload
    pub fn from_payload(payload: &str) -> Option<Self> {
        serde_json::from_str::<Envelope<BridgeError>>(payload)
            .ok()
            .map(|e| e.error)
    }
}

// ============================================================================
// NativeError
// ============================================================================

/// Failure raised by a native callee.
///
/// Converts from any `std::error::Error`, so exposed methods can use `?`
/// freely. Deliberately does not implement `std::error::Error` itself, which
/// is what makes the blanket conversion coherent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    code: ErrorCode,
    message: String,
}

impl NativeError {
    /// Error with an explicit native-band code.
    ///
    /// Codes outside the native band are clamped to [`ErrorCode::RUNTIME`].
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let code = if code.band() == ErrorBand::Native {
            code
        } else {
            ErrorCode::RUNTIME
        };
        Self {
            code,
            message: message.into(),
        }
    }

    /// Generic runtime error
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RUNTIME, message)
    }

    /// Error code
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl<E> From<E> for NativeError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        let code = match (&err as &(dyn std::error::Error + 'static)).downcast_ref::<std::io::Error>() {
            Some(io) if io.kind() == std::io::ErrorKind::PermissionDenied => ErrorCode::PERMISSION,
            Some(io) if io.kind() == std::io::ErrorKind::TimedOut => ErrorCode::TIMEOUT,
            Some(_) => ErrorCode::FILE,
            None => ErrorCode::RUNTIME,
        };
        Self::new(code, err.to_string())
    }
}

/// Result type for exposed native members
pub type NativeResult<T> = Result<T, NativeError>;
