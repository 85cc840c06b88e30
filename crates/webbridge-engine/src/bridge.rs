//! Bridge: composition root and the four universal entry points
//!
//! A `Bridge` owns the object registry, the dispatcher registry, the error
//! hook and the worker pool, and serves every script call through four
//! bindings regardless of how many classes are exposed:
//!
//! | binding              | arguments                                   | result            |
//! |----------------------|---------------------------------------------|-------------------|
//! | `<ns>_create`        | `[type, ...ctorArgs]`                       | handle string     |
//! | `<ns>_sync`          | `[type, handle, "call"/"prop"/"const", member, ...args]` | value |
//! | `<ns>_async`         | `[type, handle, method, ...args]`           | value, off-thread |
//! | `<ns>_destroy`       | `[handle]`                                  | `null`, idempotent |
//!
//! Every entry point answers with a [`Response`]; nothing escapes as a panic.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use webbridge_sdk::convert::arg;
use webbridge_sdk::{
    BridgeError, BridgeResult, ErrorCode, Handle, Response, ScriptCall, ScriptHost, Value,
};

use crate::config::BridgeConfig;
use crate::context::BridgeContext;
use crate::dispatch::{invoke, ClassHandler, DispatcherRegistry, ErrorHooks, SyncOp};
use crate::notify::Notifier;
use crate::pool::LazyPool;
use crate::registry::{ErasedObject, ObjectRegistry};

/// One of the four script-callable bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// Construct an instance
    Create,
    /// Call, read a property or read a constant on the calling thread
    Sync,
    /// Call an async method on the worker pool
    Async,
    /// Destroy an instance
    Destroy,
}

impl EntryPoint {
    /// All entry points, in binding order
    pub const ALL: [EntryPoint; 4] = [
        EntryPoint::Create,
        EntryPoint::Sync,
        EntryPoint::Async,
        EntryPoint::Destroy,
    ];

    /// Suffix after the namespace
    pub fn suffix(self) -> &'static str {
        match self {
            EntryPoint::Create => "create",
            EntryPoint::Sync => "sync",
            EntryPoint::Async => "async",
            EntryPoint::Destroy => "destroy",
        }
    }

    /// Global function name under `namespace`
    pub fn binding_name(self, namespace: &str) -> String {
        format!("{}_{}", namespace, self.suffix())
    }
}

/// The native side of the bridge
pub struct Bridge {
    config: BridgeConfig,
    host: Arc<dyn ScriptHost>,
    context: BridgeContext,
    errors: Arc<ErrorHooks>,
    classes: DispatcherRegistry,
    pool: LazyPool,
    connected: AtomicBool,
}

impl Bridge {
    /// Create a bridge talking to `host`
    pub fn new(host: Arc<dyn ScriptHost>, config: BridgeConfig) -> Self {
        let errors = Arc::new(ErrorHooks::new());
        let notifier = Notifier::new(host.clone(), &config.snippet_namespace);
        let context = BridgeContext::new(Arc::new(ObjectRegistry::new()), notifier, errors.clone());
        let pool = LazyPool::new(config.worker_threads, config.thread_name.clone());

        Self {
            config,
            host,
            context,
            errors,
            classes: DispatcherRegistry::new(),
            pool,
            connected: AtomicBool::new(false),
        }
    }

    /// Create a bridge with default settings
    pub fn with_defaults(host: Arc<dyn ScriptHost>) -> Self {
        Self::new(host, BridgeConfig::default())
    }

    /// Settings the bridge was built with
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Script host
    pub fn host(&self) -> &Arc<dyn ScriptHost> {
        &self.host
    }

    /// Context handed to class handlers
    pub fn context(&self) -> &BridgeContext {
        &self.context
    }

    /// Live objects
    pub fn objects(&self) -> &ObjectRegistry {
        self.context.objects()
    }

    /// Registered classes
    pub fn classes(&self) -> &DispatcherRegistry {
        &self.classes
    }

    /// Worker pool
    pub fn pool(&self) -> &LazyPool {
        &self.pool
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Expose a class.
    ///
    /// After [`connect`](Bridge::connect) the class is also defined on the
    /// script side.
    pub fn register_class(&self, handler: ClassHandler) -> Option<Arc<ClassHandler>> {
        let manifest = handler.manifest().clone();
        let previous = self.classes.register_class(handler);

        if self.connected.load(Ordering::Acquire) {
            let define = ScriptCall::DefineClass { manifest };
            match define.to_script(&self.config.snippet_namespace) {
                Ok(script) => self.host.init(&script),
                Err(e) => log::warn!("cannot define class on reload: {}", e),
            }
            self.context.notifier().push(&define);
        }
        previous
    }

    /// Install the error hook for native-origin errors
    pub fn set_error_hook(&self, hook: impl Fn(&mut BridgeError) + Send + Sync + 'static) {
        self.errors.set(hook);
    }

    /// Remove the error hook
    pub fn clear_error_hook(&self) {
        self.errors.clear();
    }

    /// Set the worker count. Only effective before the first async call.
    pub fn set_worker_threads(&self, threads: usize) -> bool {
        self.pool.configure(threads)
    }

    /// Bind the four entry points and define every registered class on the
    /// script side.
    ///
    /// The runtime script must already be registered with the host. The
    /// bindings hold only a weak reference to the bridge.
    pub fn connect(self: &Arc<Self>) {
        let namespace = self.config.snippet_namespace.clone();
        for entry in EntryPoint::ALL {
            let bridge = Arc::downgrade(self);
            self.host.bind(
                &entry.binding_name(&namespace),
                Arc::new(move |request_id: &str, args: &str| match bridge.upgrade() {
                    Some(bridge) => bridge.serve(entry, request_id, args),
                    None => log::warn!("bridge is gone; request {} left pending", request_id),
                }),
            );
        }

        self.connected.store(true, Ordering::Release);
        for manifest in self.classes.manifests() {
            match (ScriptCall::DefineClass { manifest }).to_script(&namespace) {
                Ok(script) => self.host.init(&script),
                Err(e) => log::warn!("cannot define class: {}", e),
            }
        }
        log::debug!("bridge connected under {}", namespace);
    }

    /// Whether [`connect`](Bridge::connect) has run
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Expose an existing native object as the script global `var_name`.
    ///
    /// The object is registered like a created instance: it gets a handle,
    /// its properties and events are wired, and `destroy` releases it.
    pub fn publish<T: Any + Send + Sync>(
        &self,
        type_name: &str,
        var_name: &str,
        object: Arc<T>,
    ) -> BridgeResult<Handle> {
        let handler = self.classes.get_handler(type_name)?;
        let object: ErasedObject = object;
        let handle = self.objects().register_erased(object.clone(), type_name);
        handler.attach(&self.context, &handle, &object);

        self.context.notifier().push(&ScriptCall::Publish {
            manifest: handler.manifest().clone(),
            var_name: var_name.to_string(),
            handle: handle.clone(),
        });
        log::debug!("published {} as {}", handle, var_name);
        Ok(handle)
    }

    /// Stop the worker pool. Queued async calls are dropped unanswered.
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// `create(type, ...ctorArgs)`
    pub fn create(&self, args_json: &str) -> Response {
        invoke::guard(|| {
            let resolved = parse_args(args_json).and_then(|args| {
                let class: String = arg(&args, 0)?;
                Ok((self.classes.get_handler(&class)?, args))
            });
            match resolved {
                Ok((handler, args)) => handler.create(&self.context, &args[1..]),
                Err(err) => Response::error(&err),
            }
        })
    }

    /// `sync(type, handle, op, member, ...args)`
    pub fn call_sync(&self, args_json: &str) -> Response {
        invoke::guard(|| match self.resolve_call(args_json, true) {
            Ok(call) => call.handler.call_sync(
                &self.context,
                &call.handle,
                call.op,
                &call.member,
                &call.args,
            ),
            Err(err) => Response::error(&err),
        })
    }

    /// `async(type, handle, method, ...args)`, settled through the host.
    ///
    /// The method body runs on the worker pool; the response is delivered
    /// with [`ScriptHost::resolve`] on the script thread. Completion order
    /// across calls is not guaranteed.
    pub fn call_async(&self, request_id: &str, args_json: &str) {
        let host = self.host.clone();
        let request_id = request_id.to_string();
        self.submit_async(args_json, move |response| {
            let target = host.clone();
            host.dispatch(Box::new(move || {
                target.resolve(&request_id, response.status(), response.payload())
            }));
        });
    }

    /// Run an async call on the pool and hand the response to `on_done`.
    ///
    /// `on_done` runs on a worker thread, or on the caller's thread when the
    /// call fails before reaching the pool.
    pub fn submit_async(&self, args_json: &str, on_done: impl FnOnce(Response) + Send + 'static) {
        let call = match self.resolve_call(args_json, false) {
            Ok(call) => call,
            Err(err) => return on_done(Response::error(&err)),
        };

        let slot = Arc::new(Mutex::new(Some(on_done)));
        let job_slot = slot.clone();
        let context = self.context.clone();
        let job = move || {
            let response = invoke::guard(|| {
                call.handler
                    .call_async(&context, &call.handle, &call.member, &call.args)
            });
            if let Some(done) = job_slot.lock().take() {
                done(response);
            }
        };

        if let Err(e) = self.pool.submit(job) {
            log::warn!("async call rejected: {}", e);
            if let Some(done) = slot.lock().take() {
                done(Response::error(&BridgeError::native(
                    ErrorCode::RUNTIME,
                    e.to_string(),
                )));
            }
        }
    }

    /// `destroy(handle)`. Unknown handles are not an error.
    pub fn destroy(&self, args_json: &str) -> Response {
        invoke::guard(|| {
            let handle = parse_args(args_json).and_then(|args| arg::<String>(&args, 0));
            match handle {
                Ok(handle) => {
                    self.destroy_handle(&handle);
                    Response::null()
                }
                Err(err) => Response::error(&err),
            }
        })
    }

    /// Remove `handle` and detach its object. Returns whether it was live.
    pub fn destroy_handle(&self, handle: &str) -> bool {
        let Some(entry) = self.objects().take(handle) else {
            return false;
        };
        if let Ok(handler) = self.classes.get_handler(entry.type_name()) {
            handler.detach(entry.object());
        }
        log::debug!("destroyed {}", handle);
        true
    }

    fn serve(&self, entry: EntryPoint, request_id: &str, args: &str) {
        let response = match entry {
            EntryPoint::Create => self.create(args),
            EntryPoint::Sync => self.call_sync(args),
            EntryPoint::Destroy => self.destroy(args),
            EntryPoint::Async => return self.call_async(request_id, args),
        };
        self.host
            .resolve(request_id, response.status(), response.payload());
    }

    fn resolve_call(&self, args_json: &str, with_op: bool) -> BridgeResult<ResolvedCall> {
        let args = parse_args(args_json)?;
        let class: String = arg(&args, 0)?;
        let handle: Handle = arg(&args, 1)?;
        let (op, member_index) = if with_op {
            (arg::<String>(&args, 2)?.parse::<SyncOp>()?, 3)
        } else {
            (SyncOp::Call, 2)
        };
        let member: String = arg(&args, member_index)?;
        let handler = self.classes.get_handler(&class)?;

        Ok(ResolvedCall {
            handler,
            handle,
            op,
            member,
            args: args[member_index + 1..].to_vec(),
        })
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("namespace", &self.config.snippet_namespace)
            .field("classes", &self.classes.class_names())
            .field("objects", &self.objects().count())
            .finish()
    }
}

struct ResolvedCall {
    handler: Arc<ClassHandler>,
    handle: Handle,
    op: SyncOp,
    member: String,
    args: Vec<Value>,
}

fn parse_args(args_json: &str) -> BridgeResult<Vec<Value>> {
    serde_json::from_str(args_json).map_err(|e| BridgeError::from_json(&e))
}
