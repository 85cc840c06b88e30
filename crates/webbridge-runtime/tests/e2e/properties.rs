//! Property pull / push scenarios

use serde_json::json;
use webbridge_engine::EntryPoint;
use webbridge_sdk::ErrorCode;

use super::fixtures::{Pod, Status};
use super::harness::*;

#[test]
fn test_initial_values_are_pulled() {
    let h = Harness::start();
    let obj = h.my_object();

    assert_eq!(obj.get("aBool").unwrap(), json!(false));
    assert_eq!(obj.get("strProp").unwrap(), json!(""));
    assert_eq!(obj.get("counter").unwrap(), json!(0));
    assert_eq!(obj.get("numbers").unwrap(), json!([]));
    assert_eq!(obj.get("status").unwrap(), json!("Idle"));
    assert_eq!(obj.get("pod").unwrap(), json!({"a": 0, "b": 0}));
}

#[test]
fn test_bar_negates_and_pushes_pod() {
    let h = Harness::start();
    let obj = h.my_object();
    let (pods, sink) = recorder();
    obj.subscribe("pod", sink).unwrap();

    assert_eq!(obj.call("bar", ()).unwrap(), json!(true));
    h.native(&obj).a_bool.set(true);
    assert_eq!(obj.call("bar", ()).unwrap(), json!(false));
    h.settle();

    // The second bar() writes the same pod and is suppressed
    assert_eq!(
        *pods.lock(),
        vec![json!({"a": 0, "b": 0}), json!({"a": 42, "b": 123456789})]
    );
    assert_eq!(obj.get("aBool").unwrap(), json!(true));
}

#[test]
fn test_subscriber_sees_current_then_changes() {
    let h = Harness::start();
    let obj = h.my_object();
    let (status, status_sink) = recorder();
    let (counter, counter_sink) = recorder();
    obj.subscribe("status", status_sink).unwrap();
    obj.subscribe("counter", counter_sink).unwrap();

    obj.call("testVectors", ()).unwrap();
    h.settle();

    assert_eq!(
        *status.lock(),
        vec![json!("Idle"), json!("Running"), json!("Completed")]
    );
    assert_eq!(*counter.lock(), vec![json!(0), json!(8)]);
    assert_eq!(obj.get("strProp").unwrap(), json!("Vector mit 8 Fibonacci-Zahlen"));
    let status: Status = serde_json::from_value(obj.get("status").unwrap()).unwrap();
    assert_eq!(status, Status::Completed);
}

#[test]
fn test_rapid_writes_deliver_in_order() {
    let h = Harness::start();
    let obj = h.my_object();
    let native = h.native(&obj);
    let (seen, sink) = recorder();
    obj.subscribe("counter", sink).unwrap();

    for i in 1..=200 {
        native.counter.set(i);
    }
    h.settle();

    let seen = seen.lock();
    assert_eq!(seen.last(), Some(&json!(200)));
    let values: Vec<i64> = seen.iter().map(|v| v.as_i64().unwrap()).collect();
    assert!(values.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(obj.get("counter").unwrap(), json!(200));
}

#[test]
fn test_unchanged_write_is_silent() {
    let h = Harness::start();
    let obj = h.my_object();
    let native = h.native(&obj);
    let (seen, sink) = recorder();
    obj.subscribe("aBool", sink).unwrap();

    assert!(!native.a_bool.set(false));
    assert!(!native.pod.set(Pod::default()));
    h.settle();
    assert_eq!(*seen.lock(), vec![json!(false)]);
}

#[test]
fn test_multiple_subscribers_and_unsubscribe() {
    let h = Harness::start();
    let obj = h.my_object();
    let native = h.native(&obj);
    let (a, sink_a) = recorder();
    let (b, sink_b) = recorder();
    let id_a = obj.subscribe("strProp", sink_a).unwrap();
    obj.subscribe("strProp", sink_b).unwrap();

    native.str_prop.set("one".into());
    h.settle();
    assert!(obj.unsubscribe("strProp", id_a).unwrap());
    native.str_prop.set("two".into());
    h.settle();

    assert_eq!(*a.lock(), vec![json!(""), json!("one")]);
    assert_eq!(*b.lock(), vec![json!(""), json!("one"), json!("two")]);
}

#[test]
fn test_prop_op_for_unknown_property() {
    let h = Harness::start();
    let obj = h.my_object();
    let err = bridge_error(h.host.invoke(
        EntryPoint::Sync,
        &[
            json!("MyObject"),
            json!(obj.handle().as_str()),
            json!("prop"),
            json!("nope"),
        ],
    ));
    assert_eq!(err.code, ErrorCode::UNKNOWN_MEMBER);
    assert!(obj.get("nope").is_err());
}
