//! ScriptHost trait, the embedding's capabilities
//!
//! The bridge never talks to a webview directly. The window/webview bootstrap
//! hands it an implementation of this trait, and the bridge treats it as an
//! opaque capability set: evaluate a script, bind a callable, settle a pending
//! call, and queue work onto the one thread that owns the script engine.

use std::sync::Arc;

/// Script-callable native function.
///
/// Receives the pending request id and the JSON-encoded argument array. The
/// function settles the request later through [`ScriptHost::resolve`].
pub type BoundFn = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Work queued onto the script-engine thread
pub type ScriptTask = Box<dyn FnOnce() + Send>;

/// Capabilities supplied by the script embedding.
///
/// # Threading
///
/// Exactly one thread owns the script engine. [`eval`](ScriptHost::eval),
/// [`resolve`](ScriptHost::resolve) and [`bind`](ScriptHost::bind) may only be
/// called on that thread; [`dispatch`](ScriptHost::dispatch) may be called
/// from any thread and is how every native → script push reaches it. Tasks
/// queued through `dispatch` run in submission order.
pub trait ScriptHost: Send + Sync {
    /// Evaluate `script` in the page. Script thread only.
    fn eval(&self, script: &str);

    /// Register `script` to run before any page script on every load.
    fn init(&self, script: &str);

    /// Expose `callback` to the script side as the global function `name`.
    fn bind(&self, name: &str, callback: BoundFn);

    /// Settle the pending call `request_id`. Status 0 resolves the script-side
    /// promise with the JSON `payload`, anything else rejects it.
    /// Script thread only.
    fn resolve(&self, request_id: &str, status: i32, payload: &str);

    /// Queue `task` to run on the script-engine thread. Callable from any
    /// thread.
    fn dispatch(&self, task: ScriptTask);
}
