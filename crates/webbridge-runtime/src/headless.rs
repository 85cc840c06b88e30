//! Headless script host
//!
//! `HeadlessHost` implements [`ScriptHost`] without a webview. It owns a
//! dedicated [`ScriptThread`] standing in for the page's script engine, keeps
//! the bound entry points in a table, and evaluates the runtime's snippets
//! with the Rust mirror of the injected runtime ([`ScriptRuntime`]).
//!
//! Callers on any other thread play the role of page script: a call is
//! queued onto the script thread, run through the bound function, and the
//! caller blocks until the bridge resolves the pending request.
//!
//! The headless page counts as already loaded, so `init` scripts that are
//! runtime snippets also run immediately. [`reload`](HeadlessHost::reload)
//! replays them on a cleared runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use webbridge_engine::{EntryPoint, ScriptThread};
use webbridge_sdk::{
    BoundFn, Handle, IntoArgs, Response, ScriptHost, ScriptTask, Value, DEFAULT_NAMESPACE,
};

use crate::error::RuntimeError;
use crate::factory::ClassFactory;
use crate::proxy::ProxyObject;
use crate::router::ScriptRuntime;

/// Name of the headless script thread
pub const SCRIPT_THREAD_NAME: &str = "webbridge-script";

/// [`ScriptHost`] backed by a dedicated thread and the Rust runtime mirror
pub struct HeadlessHost {
    namespace: String,
    timeout: Option<Duration>,
    thread: ScriptThread,
    runtime: Arc<ScriptRuntime>,
    bindings: RwLock<FxHashMap<String, BoundFn>>,
    pending: Mutex<FxHashMap<String, Sender<Response>>>,
    init_scripts: Mutex<Vec<String>>,
    next_request: AtomicU64,
}

impl HeadlessHost {
    /// Start a host with the default namespace. Callers wait for every
    /// accepted request to complete.
    pub fn new() -> Result<Arc<Self>, RuntimeError> {
        Self::start(DEFAULT_NAMESPACE, None)
    }

    /// Start a host reading snippets under `namespace`.
    ///
    /// With `timeout` set, a caller stops waiting after that long and gets
    /// [`RuntimeError::Timeout`]; the native call still runs to completion.
    pub fn start(namespace: &str, timeout: Option<Duration>) -> Result<Arc<Self>, RuntimeError> {
        let thread = ScriptThread::spawn(SCRIPT_THREAD_NAME)?;
        Ok(Arc::new(Self {
            namespace: namespace.to_string(),
            timeout,
            thread,
            runtime: Arc::new(ScriptRuntime::new(namespace)),
            bindings: RwLock::new(FxHashMap::default()),
            pending: Mutex::new(FxHashMap::default()),
            init_scripts: Mutex::new(Vec::new()),
            next_request: AtomicU64::new(0),
        }))
    }

    /// Snippet namespace
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Runtime mirror
    pub fn runtime(&self) -> &Arc<ScriptRuntime> {
        &self.runtime
    }

    /// Whether the caller is on the script thread
    pub fn is_script_thread(&self) -> bool {
        self.thread.is_current()
    }

    // ========================================================================
    // Calls into the bridge
    // ========================================================================

    /// Call entry point `entry` with a pre-encoded argument array.
    ///
    /// From the script thread itself the call runs inline; an async entry
    /// point cannot settle there and yields [`RuntimeError::WouldBlock`].
    pub fn invoke_raw(&self, entry: EntryPoint, args_json: &str) -> Result<Response, RuntimeError> {
        let name = entry.binding_name(&self.namespace);
        let binding = self
            .bindings
            .read()
            .get(&name)
            .cloned()
            .ok_or(RuntimeError::MissingBinding(name))?;

        let request_id = format!("req_{}", self.next_request.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = channel::bounded(1);
        self.pending.lock().insert(request_id.clone(), tx);

        if self.thread.is_current() {
            binding(request_id.as_str(), args_json);
            return rx.try_recv().map_err(|_| {
                self.pending.lock().remove(&request_id);
                RuntimeError::WouldBlock(request_id)
            });
        }

        let (id, args) = (request_id.clone(), args_json.to_string());
        if !self.thread.dispatch(Box::new(move || binding(id.as_str(), args.as_str()))) {
            self.pending.lock().remove(&request_id);
            return Err(RuntimeError::Stopped);
        }

        let Some(timeout) = self.timeout else {
            return rx.recv().map_err(|_| RuntimeError::Stopped);
        };
        match rx.recv_timeout(timeout) {
            Ok(response) => Ok(response),
            Err(RecvTimeoutError::Timeout) => {
                self.pending.lock().remove(&request_id);
                Err(RuntimeError::Timeout(request_id))
            }
            Err(RecvTimeoutError::Disconnected) => Err(RuntimeError::Stopped),
        }
    }

    /// Call entry point `entry` and decode the result
    pub fn invoke(&self, entry: EntryPoint, args: &[Value]) -> Result<Value, RuntimeError> {
        let args_json = serde_json::to_string(args)?;
        Ok(self.invoke_raw(entry, &args_json)?.into_result()?)
    }

    /// Create a `class` instance through its factory
    pub fn construct(
        self: &Arc<Self>,
        class: &str,
        args: impl IntoArgs,
    ) -> Result<ProxyObject, RuntimeError> {
        let factory = match self.runtime.class(class) {
            Some(factory) => factory,
            None => {
                // The definition may still be queued
                self.flush();
                self.runtime
                    .class(class)
                    .ok_or_else(|| RuntimeError::UnknownClass(class.to_string()))?
            }
        };

        let mut request = vec![Value::from(class)];
        request.extend(args.into_args()?);
        let handle: Handle = serde_json::from_value(self.invoke(EntryPoint::Create, &request)?)?;

        let state = Arc::new(factory.instantiate(handle));
        self.runtime.adopt(state.clone());
        let proxy = ProxyObject::new(state, self.clone());
        proxy.load_constants()?;
        Ok(proxy)
    }

    /// Proxy for a live `handle`
    pub fn proxy(self: &Arc<Self>, handle: &str) -> Option<ProxyObject> {
        let state = self.runtime.object(handle)?;
        Some(ProxyObject::new(state, self.clone()))
    }

    /// Proxy published as `var_name`
    pub fn global(self: &Arc<Self>, var_name: &str) -> Option<ProxyObject> {
        self.flush();
        let state = self.runtime.global(var_name)?;
        Some(ProxyObject::new(state, self.clone()))
    }

    /// Factory for `class`
    pub fn class(&self, class: &str) -> Option<Arc<ClassFactory>> {
        self.runtime.class(class)
    }

    /// Defined class names, sorted
    pub fn class_names(&self) -> Vec<String> {
        self.runtime.class_names()
    }

    /// Bound global function names, sorted
    pub fn binding_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.bindings.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Scripts registered through `init`, in order
    pub fn init_scripts(&self) -> Vec<String> {
        self.init_scripts.lock().clone()
    }

    /// Number of requests still waiting for a resolution
    pub fn pending_requests(&self) -> usize {
        self.pending.lock().len()
    }

    // ========================================================================
    // Script thread
    // ========================================================================

    /// Run `f` on the script thread and wait for it
    pub fn run<R, F>(&self, f: F) -> Option<R>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        self.thread.run(f)
    }

    /// Wait until every queued push has been applied
    pub fn flush(&self) -> bool {
        self.thread.flush()
    }

    /// Drop all script-side state and replay the init scripts
    pub fn reload(&self) -> bool {
        let runtime = self.runtime.clone();
        let scripts = self.init_scripts();
        self.thread
            .run(move || {
                runtime.clear();
                for script in &scripts {
                    runtime.evaluate(script);
                }
            })
            .is_some()
    }

    /// Stop the script thread. Pending callers fail with
    /// [`RuntimeError::Stopped`].
    pub fn shutdown(&self) {
        self.thread.shutdown();
        self.pending.lock().clear();
    }
}

impl ScriptHost for HeadlessHost {
    fn eval(&self, script: &str) {
        if !self.thread.is_current() {
            log::warn!("eval called off the script thread");
        }
        if !self.runtime.evaluate(script) {
            log::trace!("ignoring foreign script ({} bytes)", script.len());
        }
    }

    fn init(&self, script: &str) {
        self.init_scripts.lock().push(script.to_string());
        let runtime = self.runtime.clone();
        let script = script.to_string();
        self.thread.dispatch(Box::new(move || {
            runtime.evaluate(&script);
        }));
    }

    fn bind(&self, name: &str, callback: BoundFn) {
        if self
            .bindings
            .write()
            .insert(name.to_string(), callback)
            .is_some()
        {
            log::debug!("rebound {}", name);
        }
    }

    fn resolve(&self, request_id: &str, status: i32, payload: &str) {
        match self.pending.lock().remove(request_id) {
            Some(tx) => {
                let _ = tx.send(Response::from_parts(status, payload));
            }
            None => log::warn!("unresolvable request id {}", request_id),
        }
    }

    fn dispatch(&self, task: ScriptTask) {
        self.thread.dispatch(task);
    }
}
