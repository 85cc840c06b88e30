//! Registry of live native objects
//!
//! The registry owns every object exposed to the script side and is the only
//! authority on whether a handle still resolves. Lookups take a shared lock,
//! so method calls on different objects resolve concurrently; registration
//! and removal take the exclusive lock.

use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use webbridge_sdk::{BridgeError, BridgeResult, ErrorCode, Handle};

/// Type-erased shared reference to a registered object
pub type ErasedObject = Arc<dyn Any + Send + Sync>;

/// A registry entry: the object plus the type tag it was registered under
#[derive(Clone)]
pub struct ObjectEntry {
    type_name: Arc<str>,
    object: ErasedObject,
}

impl ObjectEntry {
    /// Type name the object was registered under
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Type-erased object
    pub fn object(&self) -> &ErasedObject {
        &self.object
    }

    /// Downcast to a concrete type
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.object.clone().downcast::<T>().ok()
    }
}

/// Handle → object map
pub struct ObjectRegistry {
    objects: RwLock<FxHashMap<Handle, ObjectEntry>>,
}

impl ObjectRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(FxHashMap::default()),
        }
    }

    /// Register an object and return its fresh handle.
    ///
    /// The handle is generated before the lock is taken.
    pub fn register<T: Any + Send + Sync>(&self, object: Arc<T>, type_name: &str) -> Handle {
        self.register_erased(object, type_name)
    }

    /// Register an already type-erased object
    pub fn register_erased(&self, object: ErasedObject, type_name: &str) -> Handle {
        let handle = Handle::generate(type_name);
        let entry = ObjectEntry {
            type_name: Arc::from(type_name),
            object,
        };
        self.objects.write().insert(handle.clone(), entry);
        handle
    }

    /// Get an object by handle.
    ///
    /// Returns `None` if the handle is unknown or refers to another type.
    pub fn get<T: Any + Send + Sync>(&self, handle: &str) -> Option<Arc<T>> {
        self.objects.read().get(handle).and_then(|e| e.downcast::<T>())
    }

    /// Get the raw entry for a handle
    pub fn entry(&self, handle: &str) -> Option<ObjectEntry> {
        self.objects.read().get(handle).cloned()
    }

    /// Resolve a handle that arrived from the script side.
    ///
    /// Absence is `OBJECT_NOT_FOUND`; a handle of the wrong type is
    /// `INVALID_ARGUMENT`. Both are script-origin.
    pub fn lookup<T: Any + Send + Sync>(&self, handle: &str) -> BridgeResult<Arc<T>> {
        let entry = self.entry(handle).ok_or_else(|| {
            BridgeError::script(
                ErrorCode::OBJECT_NOT_FOUND,
                format!("Object not found: {}", handle),
            )
        })?;
        entry.downcast::<T>().ok_or_else(|| {
            BridgeError::script(
                ErrorCode::INVALID_ARGUMENT,
                format!(
                    "Handle {} refers to a {}, not a {}",
                    handle,
                    entry.type_name(),
                    std::any::type_name::<T>()
                ),
            )
        })
    }

    /// Remove an object. Returns whether anything was removed.
    pub fn remove(&self, handle: &str) -> bool {
        self.take(handle).is_some()
    }

    /// Remove an object and hand back its entry
    pub fn take(&self, handle: &str) -> Option<ObjectEntry> {
        self.objects.write().remove(handle)
    }

    /// Whether a handle resolves
    pub fn contains(&self, handle: &str) -> bool {
        self.objects.read().contains_key(handle)
    }

    /// Get the number of live objects
    pub fn count(&self) -> usize {
        self.objects.read().len()
    }

    /// Get all live handles
    pub fn all_handles(&self) -> Vec<Handle> {
        self.objects.read().keys().cloned().collect()
    }

    /// Drop every object (for shutdown)
    pub fn clear(&self) {
        self.objects.write().clear();
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
