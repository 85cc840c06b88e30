//! Argument and result marshalling scenarios

use serde_json::json;
use webbridge_sdk::ErrorCode;

use super::fixtures::{Pod, Status};
use super::harness::*;

#[test]
fn test_multi_param_round_trip() {
    let h = Harness::start();
    let obj = h.my_object();
    let pod = Pod {
        a: u32::MAX,
        b: u64::MAX,
    };

    let text: String = obj
        .call_as(
            "multiParamTest",
            (-7, true, "grüße", vec![3, 1, 4], Status::Running, pod),
        )
        .unwrap();
    assert_eq!(
        text,
        format!(
            "multiParamTest called with: int=-7, bool=true, str='grüße', vec.size=3, \
             status=Running, pod.a={}, pod.b={}",
            u32::MAX,
            u64::MAX
        )
    );
    h.settle();

    assert_eq!(obj.get("counter").unwrap(), json!(-7));
    assert_eq!(obj.get("aBool").unwrap(), json!(true));
    assert_eq!(obj.get("strProp").unwrap(), json!("grüße"));
    assert_eq!(obj.get("numbers").unwrap(), json!([3, 1, 4]));
    let status: Status = serde_json::from_value(obj.get("status").unwrap()).unwrap();
    assert_eq!(status, Status::Running);
    let back: Pod = serde_json::from_value(obj.get("pod").unwrap()).unwrap();
    assert_eq!(back, pod);
}

#[test]
fn test_vector_property() {
    let h = Harness::start();
    let obj = h.my_object();
    obj.call("testVectors", ()).unwrap();
    h.settle();
    let numbers: Vec<i32> = serde_json::from_value(obj.get("numbers").unwrap()).unwrap();
    assert_eq!(numbers, vec![1, 1, 2, 3, 5, 8, 13, 21]);
}

#[test]
fn test_out_of_range_values_are_rejected() {
    let h = Harness::start();
    let obj = h.my_object();
    let cases = [
        (json!({"a": -1, "b": 0}), json!("Idle")),
        (json!({"a": 1, "b": 0}), json!("Paused")),
        (json!({"a": 1}), json!("Idle")),
    ];
    for (pod, status) in cases {
        let err = bridge_error(obj.call(
            "multiParamTest",
            (1, false, "s", Vec::<i32>::new(), status, pod),
        ));
        assert_eq!(err.code, ErrorCode::JSON_TYPE);
    }
}

#[test]
fn test_hostile_strings_survive_snippets() {
    let h = Harness::start();
    let obj = h.my_object();
    let hostile = "\"); alert('x'); (\"\n</script>\u{2028}\\";
    obj.call("foo", (hostile,)).unwrap();
    h.settle();
    assert_eq!(obj.get("strProp").unwrap(), json!(hostile));
}
