//! Per-class handler set
//!
//! A [`ClassHandler`] bundles the three universal operations for one exposed
//! type (create, sync, async) with the class manifest and the hooks that wire
//! and unwire an instance's properties and events. Handlers are usually
//! produced by [`ClassBuilder`](super::ClassBuilder) but can be written by
//! hand.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use webbridge_sdk::{BridgeError, ClassManifest, ErrorCode, Handle, Response, Value};

use crate::context::BridgeContext;
use crate::registry::ErasedObject;

/// Construct and register an instance; the payload is the new handle
pub type CreateFn = Arc<dyn Fn(&BridgeContext, &[Value]) -> Response + Send + Sync>;

/// Serve a synchronous operation on an instance
pub type SyncFn = Arc<dyn Fn(&BridgeContext, &Handle, SyncOp, &str, &[Value]) -> Response + Send + Sync>;

/// Run an async-marked method; called on a pool thread
pub type AsyncFn = Arc<dyn Fn(&BridgeContext, &Handle, &str, &[Value]) -> Response + Send + Sync>;

/// Connect an instance's properties and events to the script side
pub type AttachFn = Arc<dyn Fn(&BridgeContext, &Handle, &ErasedObject) + Send + Sync>;

/// Disconnect an instance's properties and events
pub type DetachFn = Arc<dyn Fn(&ErasedObject) + Send + Sync>;

// ============================================================================
// SyncOp
// ============================================================================

/// Operation selector of the sync entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    /// Invoke a sync method
    Call,
    /// Read a property's current value
    Prop,
    /// Read an instance or static constant
    Const,
}

impl SyncOp {
    /// Wire name
    pub fn as_str(self) -> &'static str {
        match self {
            SyncOp::Call => "call",
            SyncOp::Prop => "prop",
            SyncOp::Const => "const",
        }
    }
}

impl FromStr for SyncOp {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "call" => Ok(SyncOp::Call),
            "prop" => Ok(SyncOp::Prop),
            "const" => Ok(SyncOp::Const),
            other => Err(BridgeError::script(
                ErrorCode::INVALID_ARGUMENT,
                format!("Unknown sync operation: {}", other),
            )),
        }
    }
}

impl fmt::Display for SyncOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ClassHandler
// ============================================================================

/// Handler set for one exposed type
pub struct ClassHandler {
    manifest: ClassManifest,
    create: CreateFn,
    sync: SyncFn,
    invoke_async: AsyncFn,
    attach: Option<AttachFn>,
    detach: Option<DetachFn>,
}

impl ClassHandler {
    /// Create a handler from the three operations
    pub fn new(
        manifest: ClassManifest,
        create: impl Fn(&BridgeContext, &[Value]) -> Response + Send + Sync + 'static,
        sync: impl Fn(&BridgeContext, &Handle, SyncOp, &str, &[Value]) -> Response + Send + Sync + 'static,
        invoke_async: impl Fn(&BridgeContext, &Handle, &str, &[Value]) -> Response + Send + Sync + 'static,
    ) -> Self {
        Self {
            manifest,
            create: Arc::new(create),
            sync: Arc::new(sync),
            invoke_async: Arc::new(invoke_async),
            attach: None,
            detach: None,
        }
    }

    /// Set the attach/detach pair used by publish and destroy
    pub fn with_lifecycle(
        mut self,
        attach: impl Fn(&BridgeContext, &Handle, &ErasedObject) + Send + Sync + 'static,
        detach: impl Fn(&ErasedObject) + Send + Sync + 'static,
    ) -> Self {
        self.attach = Some(Arc::new(attach));
        self.detach = Some(Arc::new(detach));
        self
    }

    /// Exposed type name
    pub fn class_name(&self) -> &str {
        &self.manifest.class_name
    }

    /// Member manifest
    pub fn manifest(&self) -> &ClassManifest {
        &self.manifest
    }

    /// Construct an instance from constructor arguments
    pub fn create(&self, ctx: &BridgeContext, args: &[Value]) -> Response {
        (self.create)(ctx, args)
    }

    /// Serve a sync operation
    pub fn call_sync(
        &self,
        ctx: &BridgeContext,
        handle: &Handle,
        op: SyncOp,
        member: &str,
        args: &[Value],
    ) -> Response {
        (self.sync)(ctx, handle, op, member, args)
    }

    /// Run an async method body
    pub fn call_async(&self, ctx: &BridgeContext, handle: &Handle, method: &str, args: &[Value]) -> Response {
        (self.invoke_async)(ctx, handle, method, args)
    }

    /// Wire an already-registered instance
    pub fn attach(&self, ctx: &BridgeContext, handle: &Handle, object: &ErasedObject) {
        if let Some(attach) = &self.attach {
            attach(ctx, handle, object);
        }
    }

    /// Unwire an instance that is being destroyed
    pub fn detach(&self, object: &ErasedObject) {
        if let Some(detach) = &self.detach {
            detach(object);
        }
    }
}

impl fmt::Debug for ClassHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassHandler")
            .field("class_name", &self.manifest.class_name)
            .finish()
    }
}
