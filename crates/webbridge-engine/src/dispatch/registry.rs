//! Type name → class handler lookup
//!
//! Written once per type at bootstrap and read on every call. The type name
//! arrives from untrusted script input, so a miss is an ordinary
//! `UNKNOWN_TYPE` error rather than a panic.

use std::sync::Arc;

use dashmap::DashMap;
use webbridge_sdk::{BridgeError, BridgeResult, ClassManifest, ErrorCode};

use super::handler::ClassHandler;

/// Registry of exposed classes
pub struct DispatcherRegistry {
    /// Map of type name to handler set
    classes: DashMap<String, Arc<ClassHandler>>,
}

impl DispatcherRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            classes: DashMap::new(),
        }
    }

    /// Register a class under its manifest name.
    ///
    /// Replacing an existing class is allowed but logged. Returns the
    /// replaced handler, if any.
    pub fn register_class(&self, handler: ClassHandler) -> Option<Arc<ClassHandler>> {
        let name = handler.class_name().to_string();
        let previous = self.classes.insert(name.clone(), Arc::new(handler));
        if previous.is_some() {
            log::warn!("class {} registered twice; replacing previous handler", name);
        } else {
            log::debug!("registered class {}", name);
        }
        previous
    }

    /// Get the handler for `type_name`
    pub fn get_handler(&self, type_name: &str) -> BridgeResult<Arc<ClassHandler>> {
        self.classes
            .get(type_name)
            .map(|entry| entry.clone())
            .ok_or_else(|| {
                BridgeError::script(
                    ErrorCode::UNKNOWN_TYPE,
                    format!("Unknown type: {}", type_name),
                )
            })
    }

    /// Check if a class is registered
    pub fn contains(&self, type_name: &str) -> bool {
        self.classes.contains_key(type_name)
    }

    /// Get the number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no class is registered
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Registered type names, sorted
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.classes.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Manifests of every registered class, sorted by name
    pub fn manifests(&self) -> Vec<ClassManifest> {
        let mut manifests: Vec<_> = self
            .classes
            .iter()
            .map(|e| e.value().manifest().clone())
            .collect();
        manifests.sort_by(|a, b| a.class_name.cmp(&b.class_name));
        manifests
    }
}

impl Default for DispatcherRegistry {
    fn default() -> Self {
        Self::new()
    }
}
