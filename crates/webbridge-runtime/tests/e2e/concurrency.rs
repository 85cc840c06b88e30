//! Worker pool and threading scenarios

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use serde_json::json;
use webbridge_runtime::RuntimeError;
use webbridge_sdk::Value;

use super::fixtures::greeter_class;
use super::harness::*;

#[test]
fn test_more_async_calls_than_workers() {
    const CALLS: usize = 48;
    let h = Harness::with_workers(Some(2));
    let obj = h.my_object();
    let events = Arc::new(AtomicUsize::new(0));
    let counter = events.clone();
    obj.on("aEvent", move |_: &[Value]| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();

    let callers: Vec<_> = (0..CALLS)
        .map(|i| {
            let obj = obj.clone();
            thread::spawn(move || obj.call("foo", (format!("call {}", i),)))
        })
        .collect();
    for caller in callers {
        assert_eq!(caller.join().unwrap().unwrap(), Value::Null);
    }
    h.settle();

    assert_eq!(h.bridge.pool().size(), 2);
    assert_eq!(events.load(Ordering::SeqCst), CALLS);
    assert_eq!(h.host.pending_requests(), 0);
    let last = obj.get("strProp").unwrap();
    assert!(last.as_str().unwrap().starts_with("call "));
}

#[test]
fn test_worker_count_is_fixed_once_started() {
    let h = Harness::with_workers(Some(3));
    assert!(h.bridge.set_worker_threads(1));
    let obj = h.my_object();
    obj.call("foo", ("start",)).unwrap();

    assert_eq!(h.bridge.pool().size(), 1);
    assert!(!h.bridge.set_worker_threads(4));
    assert_eq!(h.bridge.pool().size(), 1);
}

#[test]
fn test_concurrent_sync_callers() {
    let h = Harness::start();
    let obj = h.my_object();
    let callers: Vec<_> = (0..8)
        .map(|_| {
            let obj = obj.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    assert_eq!(obj.call("bar", ()).unwrap(), json!(true));
                }
            })
        })
        .collect();
    for caller in callers {
        caller.join().unwrap();
    }
}

#[test]
fn test_native_writers_on_many_threads() {
    let h = Harness::start();
    let obj = h.my_object();
    let native = h.native(&obj);
    let (seen, sink) = recorder();
    obj.subscribe("counter", sink).unwrap();

    let writers: Vec<_> = (0..4)
        .map(|_| {
            let native = native.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    native.counter.update(|v| *v += 1);
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }
    h.settle();

    assert_eq!(native.counter.get(), 400);
    assert_eq!(obj.get("counter").unwrap(), json!(400));
    assert_eq!(seen.lock().last(), Some(&json!(400)));
}

#[test]
fn test_async_call_from_script_thread_would_block() {
    let h = Harness::start();
    let obj = h.my_object();
    let inner = obj.clone();
    let result = h.host.run(move || inner.call("foo", ("inline",))).unwrap();
    assert!(matches!(result, Err(RuntimeError::WouldBlock(_))));

    // The sync path still works inline
    let inner = obj.clone();
    let result = h.host.run(move || inner.call("bar", ())).unwrap();
    assert_eq!(result.unwrap(), json!(true));
}

#[test]
fn test_async_after_shutdown() {
    let h = Harness::start();
    let obj = h.my_object();
    h.bridge.shutdown();
    let err = bridge_error(obj.call("foo", ("late",)));
    assert_eq!(err.code, webbridge_sdk::ErrorCode::RUNTIME);
}

#[test]
fn test_long_running_async_call_completes() {
    let h = Harness::start();
    h.bridge.register_class(greeter_class());
    let greeter = h.host.construct("Greeter", ()).unwrap();

    let result = greeter.call("greetSlowly", ("Ada", 1500u64));
    assert_eq!(result.unwrap(), json!("Hello at last, Ada!"));
    h.settle();
    assert_eq!(greeter.get("greeting").unwrap(), json!("Hello at last, Ada!"));
    assert_eq!(h.host.pending_requests(), 0);
}
