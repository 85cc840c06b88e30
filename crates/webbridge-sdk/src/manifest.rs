//! Member manifest of an exposed class

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Names of everything a class exposes to the script side.
///
/// Serialized with the camelCase keys the script-side class factory reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassManifest {
    /// Exposed type name
    pub class_name: String,
    /// Change-notifying properties
    pub properties: Vec<String>,
    /// Forwarded events
    pub events: Vec<String>,
    /// Methods run on the calling thread
    pub sync_methods: Vec<String>,
    /// Methods run on the worker pool
    pub async_methods: Vec<String>,
    /// Per-instance constants, read once after creation
    pub instance_constants: Vec<String>,
    /// Class-level constants, embedded in the manifest
    pub static_constants: Map<String, Value>,
}

impl ClassManifest {
    /// Empty manifest for `class_name`
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    /// Whether `name` is any kind of member of this class
    pub fn has_member(&self, name: &str) -> bool {
        let contains = |list: &[String]| list.iter().any(|m| m == name);
        contains(&self.properties)
            || contains(&self.events)
            || contains(&self.sync_methods)
            || contains(&self.async_methods)
            || contains(&self.instance_constants)
            || self.static_constants.contains_key(name)
    }
}
