//! Create / destroy / publish scenarios

use std::sync::Arc;

use serde_json::json;
use webbridge_engine::EntryPoint;
use webbridge_runtime::RuntimeError;
use webbridge_sdk::{ErrorCode, Value};

use super::fixtures::{greeter_class, MyObject, APP_VERSION};
use super::harness::*;

#[test]
fn test_create_issues_typed_handle() {
    let h = Harness::start();
    let obj = h.my_object();

    assert_eq!(obj.class_name(), "MyObject");
    assert_eq!(obj.handle().type_prefix(), Some("MyObject"));
    assert!(h.bridge.objects().contains(obj.handle().as_str()));

    let other = h.my_object();
    assert_ne!(obj.handle(), other.handle());
    assert_eq!(h.bridge.objects().count(), 2);
}

#[test]
fn test_constants() {
    let h = Harness::start();
    let obj = h.my_object();
    assert_eq!(obj.constant("version").unwrap(), json!("1.0.0"));
    assert_eq!(obj.constant("appversion").unwrap(), json!(APP_VERSION));

    let defaulted = h.host.construct("MyObject", ()).unwrap();
    assert_eq!(defaulted.constant("version").unwrap(), json!("unknown"));

    let factory = h.host.class("MyObject").unwrap();
    assert_eq!(factory.static_constant("appversion"), Some(&json!(APP_VERSION)));
}

#[test]
fn test_destroy_is_idempotent() {
    let h = Harness::start();
    let obj = h.my_object();
    let handle = obj.handle().clone();

    obj.destroy().unwrap();
    obj.destroy().unwrap();
    assert!(!h.bridge.objects().contains(handle.as_str()));
    assert!(h.host.proxy(handle.as_str()).is_none());

    let err = bridge_error(obj.call("bar", ()));
    assert_eq!(err.code, ErrorCode::OBJECT_NOT_FOUND);
    let err = bridge_error(obj.get("counter"));
    assert_eq!(err.code, ErrorCode::OBJECT_NOT_FOUND);
}

#[test]
fn test_destroy_unknown_handle() {
    let h = Harness::start();
    let result = h
        .host
        .invoke(EntryPoint::Destroy, &[json!("MyObject_987654321")])
        .unwrap();
    assert_eq!(result, Value::Null);
}

#[test]
fn test_destroyed_object_stops_pushing() {
    let h = Harness::start();
    let obj = h.my_object();
    let native = h.native(&obj);
    let (seen, sink) = recorder();
    obj.subscribe("counter", sink).unwrap();

    obj.destroy().unwrap();
    native.counter.set(5);
    native.a_event.emit((1, true));
    h.settle();

    assert_eq!(*seen.lock(), vec![json!(0)]);
    assert!(!native.counter.has_on_changed());
    assert!(!native.a_event.has_forwarder());
}

#[test]
fn test_publish_existing_object() {
    let h = Harness::start();
    let native = Arc::new(MyObject::new("published"));
    let handle = h
        .bridge
        .publish("MyObject", "app", native.clone())
        .unwrap();

    let app = h.host.global("app").expect("global app");
    assert_eq!(app.handle(), &handle);
    assert_eq!(app.constant("version").unwrap(), json!("published"));

    native.a_bool.set(true);
    h.settle();
    assert_eq!(app.get("aBool").unwrap(), json!(true));
    assert_eq!(app.call("bar", ()).unwrap(), json!(false));

    app.destroy().unwrap();
    assert!(h.host.global("app").is_none());
}

#[test]
fn test_publish_unknown_type() {
    let h = Harness::start();
    let err = h
        .bridge
        .publish("Nope", "x", Arc::new(MyObject::new("v")))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::UNKNOWN_TYPE);
}

#[test]
fn test_class_registered_after_install() {
    let h = Harness::start();
    assert!(matches!(
        h.host.construct("Greeter", ()),
        Err(RuntimeError::UnknownClass(_))
    ));

    h.bridge.register_class(greeter_class());
    let greeter = h.host.construct("Greeter", ()).unwrap();
    assert_eq!(
        greeter.call("greet", ("Ada",)).unwrap(),
        json!("Hello, Ada!")
    );
    h.settle();
    assert_eq!(greeter.get("greeting").unwrap(), json!("Hello, Ada!"));
}

#[test]
fn test_reload_keeps_classes_and_drops_proxies() {
    let h = Harness::start();
    let obj = h.my_object();
    assert!(h.host.reload());

    assert_eq!(h.host.class_names(), vec!["MyObject".to_string()]);
    assert!(h.host.proxy(obj.handle().as_str()).is_none());
    // The native object outlives the page until destroyed
    assert!(h.bridge.objects().contains(obj.handle().as_str()));
    assert!(h.host.construct("MyObject", ("2",)).is_ok());
}
