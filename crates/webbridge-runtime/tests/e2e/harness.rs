//! Test harness: a headless host with an installed bridge

use std::sync::Arc;

use parking_lot::Mutex;
use webbridge_engine::{Bridge, BridgeConfig};
use webbridge_runtime::{install, HeadlessHost, ProxyObject, RuntimeError};
use webbridge_sdk::{BridgeError, Value};

use crate::fixtures::{my_object_class, MyObject};

pub struct Harness {
    pub host: Arc<HeadlessHost>,
    pub bridge: Arc<Bridge>,
}

impl Harness {
    /// Host and bridge with `MyObject` exposed and the runtime installed
    pub fn start() -> Self {
        Self::with_workers(None)
    }

    pub fn with_workers(worker_threads: Option<usize>) -> Self {
        let host = HeadlessHost::new().expect("script thread");
        let config = BridgeConfig {
            worker_threads,
            ..BridgeConfig::default()
        };
        let bridge = Arc::new(Bridge::new(host.clone(), config));
        bridge.register_class(my_object_class());
        install(&bridge);
        Self { host, bridge }
    }

    pub fn my_object(&self) -> ProxyObject {
        self.host
            .construct("MyObject", ("1.0.0",))
            .expect("create MyObject")
    }

    /// Native object behind `proxy`
    pub fn native(&self, proxy: &ProxyObject) -> Arc<MyObject> {
        self.bridge
            .objects()
            .get::<MyObject>(proxy.handle().as_str())
            .expect("live native object")
    }

    /// Apply every queued push
    pub fn settle(&self) {
        assert!(self.host.flush(), "script thread stopped");
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.bridge.shutdown();
        self.host.shutdown();
    }
}

/// Shared log plus a subscriber appending to it
pub fn recorder() -> (Arc<Mutex<Vec<Value>>>, impl Fn(&Value) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    (seen, move |value: &Value| sink.lock().push(value.clone()))
}

/// The structured error carried by `result`
pub fn bridge_error<T: std::fmt::Debug>(result: Result<T, RuntimeError>) -> BridgeError {
    match result {
        Err(RuntimeError::Call(err)) => err,
        other => panic!("expected a bridge error, got {:?}", other),
    }
}
