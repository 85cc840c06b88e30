//! WebBridge SDK - wire-level types shared by both sides of the bridge
//!
//! This crate holds everything the native engine and the script runtime must
//! agree on without depending on each other:
//!
//! - [`BridgeError`] and the [`ErrorCode`] bands
//! - [`Handle`], the opaque object identifier
//! - [`Response`], the status/payload envelope
//! - [`FromArgs`] / [`IntoArgs`] for positional argument marshalling
//! - [`ClassManifest`], the member list of an exposed class
//! - [`ScriptCall`], the native → script snippet codec
//! - [`ScriptHost`], the capabilities the embedding supplies

#![warn(missing_docs)]

pub mod convert;
pub mod error;
pub mod handle;
pub mod host;
pub mod manifest;
pub mod response;
pub mod snippet;

pub use convert::{FromArgs, IntoArgs};
pub use error::{
    BridgeError, BridgeResult, ErrorBand, ErrorCode, ErrorOrigin, NativeError, NativeResult,
};
pub use handle::Handle;
pub use host::{BoundFn, ScriptHost, ScriptTask};
pub use manifest::ClassManifest;
pub use response::Response;
pub use snippet::{ScriptCall, DEFAULT_NAMESPACE};

/// Re-export of the JSON value type used throughout the wire protocol
pub use serde_json::Value;
