//! Event fan-out scenarios

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam::channel;
use parking_lot::Mutex;
use serde_json::json;
use webbridge_sdk::Value;

use super::fixtures::MyObject;
use super::harness::*;

#[test]
fn test_foo_emits_to_listeners_in_order() {
    let h = Harness::start();
    let obj = h.my_object();
    let log = Arc::new(Mutex::new(Vec::new()));
    for tag in ["first", "second"] {
        let log = log.clone();
        obj.on("aEvent", move |args: &[Value]| {
            log.lock().push((tag, args.to_vec()))
        })
        .unwrap();
    }

    assert_eq!(obj.call("foo", ("hello",)).unwrap(), Value::Null);
    h.settle();

    let expected = vec![json!(42), json!(false)];
    assert_eq!(
        *log.lock(),
        vec![("first", expected.clone()), ("second", expected)]
    );
    assert_eq!(obj.get("strProp").unwrap(), json!("hello"));
}

#[test]
fn test_once_and_off() {
    let h = Harness::start();
    let obj = h.my_object();
    let once_hits = Arc::new(AtomicUsize::new(0));
    let on_hits = Arc::new(AtomicUsize::new(0));

    let counter = once_hits.clone();
    obj.once("aEvent", move |_: &[Value]| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();
    let counter = on_hits.clone();
    let id = obj
        .on("aEvent", move |_: &[Value]| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    obj.call("foo", ("a",)).unwrap();
    obj.call("foo", ("b",)).unwrap();
    h.settle();
    assert!(obj.off("aEvent", id).unwrap());
    obj.call("foo", ("c",)).unwrap();
    h.settle();

    assert_eq!(once_hits.load(Ordering::SeqCst), 1);
    assert_eq!(on_hits.load(Ordering::SeqCst), 2);
}

#[test]
fn test_emit_without_listener_is_silent() {
    let h = Harness::start();
    let obj = h.my_object();
    h.native(&obj).a_event.emit((7, true));
    h.settle();

    // Not exposed at all: no forwarder yet
    let loose = MyObject::new("loose");
    loose.a_event.emit((1, false));
    assert!(!loose.a_event.has_forwarder());
}

#[test]
fn test_listener_calls_back_into_native() {
    let h = Harness::start();
    let obj = h.my_object();
    let (tx, rx) = channel::unbounded();
    let inner = obj.clone();
    obj.once("aEvent", move |_: &[Value]| {
        let _ = tx.send(inner.call("bar", ()).map_err(|e| e.to_string()));
    })
    .unwrap();

    obj.call("foo", ("x",)).unwrap();
    h.settle();
    assert_eq!(rx.try_recv().unwrap(), Ok(json!(true)));
}

#[test]
fn test_unknown_event() {
    let h = Harness::start();
    let obj = h.my_object();
    assert!(obj.on("nope", |_: &[Value]| {}).is_err());
}
