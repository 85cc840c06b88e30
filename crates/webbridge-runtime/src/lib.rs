//! WebBridge Runtime - the script side of the bridge
//!
//! Two renditions of the same runtime live here:
//! - `js/runtime.js`, injected into a real webview ([`RUNTIME_JS`],
//!   [`runtime_script`])
//! - a Rust mirror of it ([`PropertyStore`], [`EventEmitter`],
//!   [`ClassFactory`], [`ScriptRuntime`]) driven by [`HeadlessHost`], a
//!   [`ScriptHost`](webbridge_sdk::ScriptHost) with its own script thread
//!
//! [`install`] wires a [`Bridge`](webbridge_engine::Bridge) into either.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Runtime errors
pub mod error;

/// Script-side event emitters
pub mod emitter;

/// Class factories
pub mod factory;

/// Headless script host
pub mod headless;

/// Runtime installation
pub mod install;

/// Injected JavaScript runtime
pub mod js;

/// Proxy objects
pub mod proxy;

/// Notification router
pub mod router;

/// Script-side property stores
pub mod store;

pub use emitter::{EventEmitter, Listener, ListenerId};
pub use error::RuntimeError;
pub use factory::{ClassFactory, MemberKind};
pub use headless::{HeadlessHost, SCRIPT_THREAD_NAME};
pub use install::{install, start_headless};
pub use js::{runtime_script, RUNTIME_JS};
pub use proxy::{ProxyObject, ProxyState};
pub use router::ScriptRuntime;
pub use store::{PropertyStore, Subscriber, SubscriptionId};
