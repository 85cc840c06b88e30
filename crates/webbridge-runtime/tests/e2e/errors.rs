//! Error propagation scenarios

use serde_json::json;
use webbridge_engine::EntryPoint;
use webbridge_runtime::RuntimeError;
use webbridge_sdk::{ErrorBand, ErrorCode, ErrorOrigin, Value};

use super::harness::*;

#[test]
fn test_native_error_is_annotated() {
    let h = Harness::start();
    let obj = h.my_object();

    let err = bridge_error(obj.call("throwError", ()));
    assert_eq!(err.code, ErrorCode::RUNTIME);
    assert_eq!(err.message, "Test error");
    assert_eq!(err.origin, ErrorOrigin::Native);
    assert_eq!(err.native_function.as_deref(), Some("MyObject::throwError"));
    assert_eq!(err.band(), ErrorBand::Native);

    // The object is still usable
    assert_eq!(obj.call("bar", ()).unwrap(), json!(true));
}

#[test]
fn test_unknown_type() {
    let h = Harness::start();
    let err = bridge_error(h.host.invoke(EntryPoint::Create, &[json!("Nope")]));
    assert_eq!(err.code, ErrorCode::UNKNOWN_TYPE);
    assert_eq!(err.origin, ErrorOrigin::Script);
    assert!(err.message.contains("Nope"));

    assert!(matches!(
        h.host.construct("Nope", ()),
        Err(RuntimeError::UnknownClass(_))
    ));
}

fn sync_request(handle: &str, op: &str, member: &str, args: &[Value]) -> Vec<Value> {
    let mut request = vec![json!("MyObject"), json!(handle), json!(op), json!(member)];
    request.extend_from_slice(args);
    request
}

#[test]
fn test_malformed_requests_map_to_script_band() {
    let h = Harness::start();
    let obj = h.my_object();
    let handle = obj.handle().as_str();

    let parse = h
        .host
        .invoke_raw(EntryPoint::Sync, "[\"MyObject\",")
        .unwrap();
    assert_eq!(parse.status(), ErrorCode::JSON_PARSE.as_i32());

    let cases = [
        // wrong type for the int parameter
        (sync_request(handle, "call", "multiParamTest", &[json!("x")]), ErrorCode::JSON_TYPE),
        // missing trailing parameters
        (
            sync_request(handle, "call", "multiParamTest", &[json!(1), json!(true)]),
            ErrorCode::JSON_ACCESS,
        ),
        // surplus parameter
        (sync_request(handle, "call", "bar", &[json!(1)]), ErrorCode::INVALID_ARGUMENT),
        // unknown operation
        (sync_request(handle, "poke", "bar", &[]), ErrorCode::INVALID_ARGUMENT),
        // unknown handle
        (sync_request("MyObject_987654321", "call", "bar", &[]), ErrorCode::OBJECT_NOT_FOUND),
        // unknown member
        (sync_request(handle, "call", "nope", &[]), ErrorCode::UNKNOWN_MEMBER),
        // async method through the sync entry point
        (sync_request(handle, "call", "foo", &[json!("x")]), ErrorCode::UNKNOWN_MEMBER),
        // unknown constant
        (sync_request(handle, "const", "nope", &[]), ErrorCode::UNKNOWN_MEMBER),
    ];
    for (request, code) in cases {
        let err = bridge_error(h.host.invoke(EntryPoint::Sync, &request));
        assert_eq!(err.code, code, "{:?}", request);
        assert_eq!(err.origin, ErrorOrigin::Script);
        assert_eq!(err.band(), ErrorBand::Script);
    }
}

#[test]
fn test_async_argument_errors() {
    let h = Harness::start();
    let obj = h.my_object();
    let err = bridge_error(obj.call("foo", (5,)));
    assert_eq!(err.code, ErrorCode::JSON_TYPE);

    let err = bridge_error(h.host.invoke(
        EntryPoint::Async,
        &[json!("MyObject"), json!(obj.handle().as_str()), json!("bar")],
    ));
    assert_eq!(err.code, ErrorCode::UNKNOWN_MEMBER);
}

#[test]
fn test_error_hook_sees_native_errors_only() {
    let h = Harness::start();
    h.bridge.set_error_hook(|err| {
        err.stack = Some("native frame #0".to_string());
    });
    let obj = h.my_object();

    let err = bridge_error(obj.call("throwError", ()));
    assert_eq!(err.stack.as_deref(), Some("native frame #0"));

    let err = bridge_error(h.host.invoke(
        EntryPoint::Sync,
        &sync_request(obj.handle().as_str(), "call", "nope", &[]),
    ));
    assert_eq!(err.stack, None);

    h.bridge.clear_error_hook();
    let err = bridge_error(obj.call("throwError", ()));
    assert_eq!(err.stack, None);
}

#[test]
fn test_proxy_rejects_undeclared_member() {
    let h = Harness::start();
    let obj = h.my_object();
    assert!(matches!(
        obj.call("aBool", ()),
        Err(RuntimeError::NoSuchMember { kind: "method", .. })
    ));
    assert!(matches!(
        obj.constant("counter"),
        Err(RuntimeError::NoSuchMember { kind: "constant", .. })
    ));
}
