//! Invocation boundary: decode → invoke → encode
//!
//! Every call into a native member funnels through [`invoke_and_serialize`].
//! Each phase fails in its own way, and all of them come out as a
//! [`Response`]:
//!
//! | failure                          | code   | origin     |
//! |----------------------------------|--------|------------|
//! | argument decoding, bad handle    | 4xxx   | javascript |
//! | callee returned `NativeError`    | 5xxx   | cpp        |
//! | callee panicked with a message   | 5000   | cpp        |
//! | result failed to encode          | 5000   | cpp        |
//! | anything else                    | 5999   | unknown    |
//!
//! Native-origin errors are annotated with the member name and routed through
//! the error hook.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use webbridge_sdk::{BridgeError, BridgeResult, ErrorCode, ErrorOrigin, NativeError, Response};

use super::hooks::ErrorHooks;

/// Failure inside one invocation
#[derive(Debug)]
pub enum CallError {
    /// Already-classified error (usually script-origin decoding)
    Bridge(BridgeError),
    /// The callee itself failed
    Native(NativeError),
}

impl From<BridgeError> for CallError {
    fn from(err: BridgeError) -> Self {
        CallError::Bridge(err)
    }
}

impl From<NativeError> for CallError {
    fn from(err: NativeError) -> Self {
        CallError::Native(err)
    }
}

/// Result of the invoke phase
pub type CallResult<T> = Result<T, CallError>;

/// Run `f` and convert every failure mode into a classified error.
///
/// `function` names the member being invoked, e.g. `"MyObject::foo"`.
pub fn capture<R>(
    hooks: &ErrorHooks,
    function: &str,
    f: impl FnOnce() -> CallResult<R>,
) -> BridgeResult<R> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(CallError::Bridge(err))) => {
            if err.origin == ErrorOrigin::Native {
                Err(finish_native(hooks, function, err))
            } else {
                Err(err)
            }
        }
        Ok(Err(CallError::Native(err))) => Err(finish_native(
            hooks,
            function,
            BridgeError::native(err.code(), err.message()),
        )),
        Err(payload) => match panic_message(payload.as_ref()) {
            Some(message) => Err(finish_native(
                hooks,
                function,
                BridgeError::native(ErrorCode::RUNTIME, message),
            )),
            None => Err(BridgeError::unknown()),
        },
    }
}

/// Invoke and encode the result as a wire response.
pub fn invoke_and_serialize<R: Serialize>(
    hooks: &ErrorHooks,
    function: &str,
    f: impl FnOnce() -> CallResult<R>,
) -> Response {
    let encoded = capture(hooks, function, f).and_then(|value| {
        serde_json::to_string(&value).map_err(|e| {
            finish_native(
                hooks,
                function,
                BridgeError::native(ErrorCode::RUNTIME, format!("failed to encode result: {}", e)),
            )
        })
    });
    Response::from(encoded)
}

/// Outermost catch-all around an entry point.
///
/// Anything that escapes the per-member boundary becomes the unknown error.
pub fn guard(f: impl FnOnce() -> Response) -> Response {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        log::error!(
            "unhandled fault at bridge entry point: {}",
            panic_message(payload.as_ref()).unwrap_or_else(|| "non-string panic".to_string())
        );
        Response::error(&BridgeError::unknown())
    })
}

fn finish_native(hooks: &ErrorHooks, function: &str, mut err: BridgeError) -> BridgeError {
    if err.native_function.is_none() {
        err.native_function = Some(function.to_string());
    }
    hooks.apply(&mut err);
    err
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        Some((*s).to_string())
    } else {
        payload.downcast_ref::<String>().cloned()
    }
}
