//! In-process host for unit tests: runs dispatched tasks inline and records
//! everything the bridge asks of it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use webbridge_sdk::{BoundFn, ScriptHost, ScriptTask};

#[derive(Default)]
pub(crate) struct RecordingHost {
    evaluated: Mutex<Vec<String>>,
    init_scripts: Mutex<Vec<String>>,
    bindings: Mutex<FxHashMap<String, BoundFn>>,
    resolved: Mutex<Vec<(String, i32, String)>>,
    dispatched: AtomicUsize,
}

impl RecordingHost {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn evaluated(&self) -> Vec<String> {
        self.evaluated.lock().clone()
    }

    pub(crate) fn init_scripts(&self) -> Vec<String> {
        self.init_scripts.lock().clone()
    }

    pub(crate) fn resolved(&self) -> Vec<(String, i32, String)> {
        self.resolved.lock().clone()
    }

    pub(crate) fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }

    pub(crate) fn binding(&self, name: &str) -> Option<BoundFn> {
        self.bindings.lock().get(name).cloned()
    }

    pub(crate) fn binding_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.bindings.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl ScriptHost for RecordingHost {
    fn eval(&self, script: &str) {
        self.evaluated.lock().push(script.to_string());
    }

    fn init(&self, script: &str) {
        self.init_scripts.lock().push(script.to_string());
    }

    fn bind(&self, name: &str, callback: BoundFn) {
        self.bindings.lock().insert(name.to_string(), callback);
    }

    fn resolve(&self, request_id: &str, status: i32, payload: &str) {
        self.resolved
            .lock()
            .push((request_id.to_string(), status, payload.to_string()));
    }

    fn dispatch(&self, task: ScriptTask) {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
        task();
    }
}
