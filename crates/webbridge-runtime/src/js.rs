//! The injected JavaScript runtime

use webbridge_sdk::{Value, DEFAULT_NAMESPACE};

/// Runtime source, written for the default namespace
pub const RUNTIME_JS: &str = include_str!("../js/runtime.js");

const NAMESPACE_DECL: &str = "const NS = \"__webbridge\";";

/// Runtime source for `namespace`
pub fn runtime_script(namespace: &str) -> String {
    if namespace == DEFAULT_NAMESPACE {
        return RUNTIME_JS.to_string();
    }
    RUNTIME_JS.replacen(
        NAMESPACE_DECL,
        &format!("const NS = {};", Value::from(namespace)),
        1,
    )
}
