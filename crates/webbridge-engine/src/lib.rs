//! WebBridge Engine - the native side of the bridge
//!
//! This crate exposes native Rust objects to a webview's script engine:
//! - **Registry**: live objects keyed by opaque handles (`registry` module)
//! - **Dispatch**: per-class handler sets behind four universal entry points
//!   (`dispatch` module)
//! - **Property / Event**: change-notifying values and forwarded signals
//! - **Pool**: worker threads for async-marked methods (`pool` module)
//! - **Bridge**: the composition root that owns all of the above
//!
//! # Example
//!
//! ```rust,ignore
//! use webbridge_engine::{Bridge, ClassBuilder, Property};
//!
//! #[derive(Default)]
//! struct Counter {
//!     value: Property<i64>,
//! }
//!
//! let bridge = Arc::new(Bridge::with_defaults(host));
//! bridge.register_class(
//!     ClassBuilder::<Counter>::new("Counter")
//!         .default_constructor()
//!         .property("value", |c| &c.value)
//!         .method("increment", |c, ()| Ok(c.value.update(|v| *v += 1)))
//!         .build(),
//! );
//! bridge.connect();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Bridge composition root and entry points
pub mod bridge;

/// Bridge configuration
pub mod config;

/// Shared handler context
pub mod context;

/// Class handlers, builder, dispatcher registry and invocation boundary
pub mod dispatch;

/// Single-forwarder events
pub mod event;

/// Native → script push channel
pub mod notify;

/// Worker pool
pub mod pool;

/// Change-notifying properties
pub mod property;

/// Live object registry
pub mod registry;

/// Dedicated script-engine thread
pub mod script_thread;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use bridge::{Bridge, EntryPoint};
pub use config::{BridgeConfig, ConfigError};
pub use context::BridgeContext;
pub use dispatch::{ClassBuilder, ClassHandler, DispatcherRegistry, ErrorHooks, SyncOp};
pub use event::Event;
pub use notify::Notifier;
pub use pool::{LazyPool, PoolError, WorkerPool};
pub use property::Property;
pub use registry::{ErasedObject, ObjectEntry, ObjectRegistry};
pub use script_thread::ScriptThread;

pub use webbridge_sdk as sdk;
