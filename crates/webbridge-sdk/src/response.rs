//! Response envelope returned by every entry point.

use serde::Serialize;

use crate::error::{BridgeError, BridgeResult, ErrorCode};

/// Status/payload pair delivered to the script side.
///
/// `status` is 0 on success and the error code otherwise. On success the
/// payload is the bare JSON value, on failure an `{"error": {...}}` object.
/// Both halves are always produced together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: i32,
    payload: String,
}

impl Response {
    /// Success status
    pub const OK: i32 = 0;

    /// Successful response with a pre-encoded JSON payload
    pub fn ok(payload: impl Into<String>) -> Self {
        Self {
            status: Self::OK,
            payload: payload.into(),
        }
    }

    /// Successful response carrying `null`
    pub fn null() -> Self {
        Self::ok("null")
    }

    /// Encode `value` as the success payload.
    ///
    /// An unencodable value yields a native-band error response.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(payload) => Self::ok(payload),
            Err(e) => Self::error(&BridgeError::native(
                ErrorCode::RUNTIME,
                format!("failed to encode result: {}", e),
            )),
        }
    }

    /// Error response
    pub fn error(err: &BridgeError) -> Self {
        Self {
            status: err.code.as_i32(),
            payload: err.dump(),
        }
    }

    /// Rebuild a response from the pair a host delivered
    pub fn from_parts(status: i32, payload: impl Into<String>) -> Self {
        Self {
            status,
            payload: payload.into(),
        }
    }

    /// Status code
    pub fn status(&self) -> i32 {
        self.status
    }

    /// JSON payload text
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Whether this is a success response
    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }

    /// Split into `(status, payload)`
    pub fn into_parts(self) -> (i32, String) {
        (self.status, self.payload)
    }

    /// Decode into a value or the carried error.
    ///
    /// A malformed error payload decodes to the unknown error.
    pub fn into_result(self) -> BridgeResult<serde_json::Value> {
        if self.is_ok() {
            serde_json::from_str(&self.payload).map_err(|e| BridgeError::from_json(&e))
        } else {
            Err(BridgeError::from_payload(&self.payload).unwrap_or_else(BridgeError::unknown))
        }
    }
}

impl From<BridgeResult<String>> for Response {
    fn from(result: BridgeResult<String>) -> Self {
        match result {
            Ok(payload) => Response::ok(payload),
            Err(err) => Response::error(&err),
        }
    }
}
