//! Notification router
//!
//! Receives every native → script snippet and routes it to the matching
//! class factory, store or emitter. Pushes for handles or members the script
//! side does not know are dropped; they are the normal tail of a destroy.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use webbridge_sdk::{ClassManifest, Handle, ScriptCall};

use crate::factory::ClassFactory;
use crate::proxy::ProxyState;

/// Script-side registry of classes, live proxies and published globals
pub struct ScriptRuntime {
    namespace: String,
    classes: RwLock<FxHashMap<String, Arc<ClassFactory>>>,
    objects: RwLock<FxHashMap<Handle, Arc<ProxyState>>>,
    globals: RwLock<FxHashMap<String, Handle>>,
}

impl ScriptRuntime {
    /// Empty runtime reading snippets under `namespace`
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            classes: RwLock::new(FxHashMap::default()),
            objects: RwLock::new(FxHashMap::default()),
            globals: RwLock::new(FxHashMap::default()),
        }
    }

    /// Snippet namespace
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Run `script` if it is a runtime snippet. Returns whether it was one.
    pub fn evaluate(&self, script: &str) -> bool {
        match ScriptCall::parse(script, &self.namespace) {
            Some(call) => {
                self.route(call);
                true
            }
            None => false,
        }
    }

    /// Route one decoded snippet
    pub fn route(&self, call: ScriptCall) {
        match call {
            ScriptCall::Notify {
                handle,
                member,
                value,
            } => match self.object(handle.as_str()).as_deref().and_then(|o| o.store(&member)) {
                Some(store) => store.notify(value),
                None => log::trace!("dropping {}.{} notification", handle, member),
            },
            ScriptCall::Emit {
                handle,
                event,
                args,
            } => match self.object(handle.as_str()).as_deref().and_then(|o| o.emitter(&event)) {
                Some(emitter) => emitter.dispatch(&args),
                None => log::trace!("dropping {}.{} event", handle, event),
            },
            ScriptCall::DefineClass { manifest } => {
                self.define(manifest);
            }
            ScriptCall::Publish {
                manifest,
                var_name,
                handle,
            } => {
                let factory = match self.class(&manifest.class_name) {
                    Some(factory) => factory,
                    None => self.define(manifest),
                };
                self.adopt(Arc::new(factory.instantiate(handle.clone())));
                log::debug!("published {} as {}", handle, var_name);
                self.globals.write().insert(var_name, handle);
            }
        }
    }

    /// Install (or replace) the factory for `manifest`
    pub fn define(&self, manifest: ClassManifest) -> Arc<ClassFactory> {
        let factory = Arc::new(ClassFactory::new(manifest));
        log::debug!("defined class {}", factory.class_name());
        self.classes
            .write()
            .insert(factory.class_name().to_string(), factory.clone());
        factory
    }

    /// Start routing pushes for `state`
    pub fn adopt(&self, state: Arc<ProxyState>) {
        self.objects.write().insert(state.handle().clone(), state);
    }

    /// Stop routing pushes for `handle`
    pub fn forget(&self, handle: &str) -> Option<Arc<ProxyState>> {
        self.objects.write().remove(handle)
    }

    /// Live proxy for `handle`
    pub fn object(&self, handle: &str) -> Option<Arc<ProxyState>> {
        self.objects.read().get(handle).cloned()
    }

    /// Number of live proxies
    pub fn object_count(&self) -> usize {
        self.objects.read().len()
    }

    /// Factory for `class_name`
    pub fn class(&self, class_name: &str) -> Option<Arc<ClassFactory>> {
        self.classes.read().get(class_name).cloned()
    }

    /// Defined class names, sorted
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.classes.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Proxy published as `var_name`, if still live
    pub fn global(&self, var_name: &str) -> Option<Arc<ProxyState>> {
        let handle = self.globals.read().get(var_name).cloned()?;
        self.object(handle.as_str())
    }

    /// Drop every class, proxy and global, as a page reload does
    pub fn clear(&self) {
        self.classes.write().clear();
        self.objects.write().clear();
        self.globals.write().clear();
    }
}
