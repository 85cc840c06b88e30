//! Shared state handed to every class handler

use std::sync::Arc;

use crate::dispatch::ErrorHooks;
use crate::notify::Notifier;
use crate::registry::ObjectRegistry;

/// What a handler can reach while serving a call.
///
/// Cheap to clone; all parts are shared with the owning bridge.
#[derive(Clone)]
pub struct BridgeContext {
    objects: Arc<ObjectRegistry>,
    notifier: Notifier,
    errors: Arc<ErrorHooks>,
}

impl BridgeContext {
    /// Assemble a context from its parts
    pub fn new(objects: Arc<ObjectRegistry>, notifier: Notifier, errors: Arc<ErrorHooks>) -> Self {
        Self {
            objects,
            notifier,
            errors,
        }
    }

    /// Live objects
    pub fn objects(&self) -> &Arc<ObjectRegistry> {
        &self.objects
    }

    /// Push channel to the script side
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Error hook slot
    pub fn errors(&self) -> &ErrorHooks {
        &self.errors
    }
}
