//! Proxy objects
//!
//! A [`ProxyState`] is the script-side view of one native object: a store per
//! property, an emitter per event and the instance constants read so far. It
//! is what the notification router writes into. A [`ProxyObject`] pairs that
//! state with the host so calls can travel back through the four entry
//! points.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde_json::Map;
use webbridge_engine::EntryPoint;
use webbridge_sdk::{Handle, IntoArgs, Value};

use crate::emitter::{EventEmitter, Listener, ListenerId};
use crate::error::RuntimeError;
use crate::factory::{ClassFactory, MemberKind};
use crate::headless::HeadlessHost;
use crate::store::{PropertyStore, Subscriber, SubscriptionId};

/// Script-side state of one native object
pub struct ProxyState {
    handle: Handle,
    factory: Arc<ClassFactory>,
    stores: FxHashMap<String, Arc<PropertyStore>>,
    emitters: FxHashMap<String, Arc<EventEmitter>>,
    constants: RwLock<Map<String, Value>>,
}

impl ProxyState {
    pub(crate) fn new(handle: Handle, factory: Arc<ClassFactory>) -> Self {
        let manifest = factory.manifest();
        let stores = manifest
            .properties
            .iter()
            .map(|name| (name.clone(), Arc::new(PropertyStore::new(name.as_str()))))
            .collect();
        let emitters = manifest
            .events
            .iter()
            .map(|name| (name.clone(), Arc::new(EventEmitter::new(name.as_str()))))
            .collect();

        Self {
            handle,
            factory,
            stores,
            emitters,
            constants: RwLock::new(Map::new()),
        }
    }

    /// Object handle
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Class factory the proxy was built from
    pub fn factory(&self) -> &Arc<ClassFactory> {
        &self.factory
    }

    /// Store for `property`
    pub fn store(&self, property: &str) -> Option<&Arc<PropertyStore>> {
        self.stores.get(property)
    }

    /// Emitter for `event`
    pub fn emitter(&self, event: &str) -> Option<&Arc<EventEmitter>> {
        self.emitters.get(event)
    }

    /// Instance constant already read, or class-level constant
    pub fn constant(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.constants.read().get(name) {
            return Some(value.clone());
        }
        self.factory.static_constant(name).cloned()
    }

    pub(crate) fn set_constant(&self, name: &str, value: Value) {
        self.constants.write().insert(name.to_string(), value);
    }
}

impl fmt::Debug for ProxyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyState")
            .field("handle", &self.handle)
            .field("class", &self.factory.class_name())
            .finish()
    }
}

/// Handle-bound proxy for calling into a native object
#[derive(Clone)]
pub struct ProxyObject {
    state: Arc<ProxyState>,
    host: Arc<HeadlessHost>,
}

impl ProxyObject {
    pub(crate) fn new(state: Arc<ProxyState>, host: Arc<HeadlessHost>) -> Self {
        Self { state, host }
    }

    /// Object handle
    pub fn handle(&self) -> &Handle {
        self.state.handle()
    }

    /// Exposed class name
    pub fn class_name(&self) -> &str {
        self.state.factory().class_name()
    }

    /// Script-side state
    pub fn state(&self) -> &Arc<ProxyState> {
        &self.state
    }

    // ========================================================================
    // Methods
    // ========================================================================

    /// Call a sync or async method and wait for its result
    pub fn call(&self, method: &str, args: impl IntoArgs) -> Result<Value, RuntimeError> {
        let args = args.into_args()?;
        match self.state.factory().member_kind(method) {
            Some(MemberKind::SyncMethod) => self
                .host
                .invoke(EntryPoint::Sync, &self.request(Some("call"), method, args)),
            Some(MemberKind::AsyncMethod) => self
                .host
                .invoke(EntryPoint::Async, &self.request(None, method, args)),
            _ => Err(self.no_such(method, "method")),
        }
    }

    /// [`call`](ProxyObject::call) and decode the result
    pub fn call_as<R: DeserializeOwned>(
        &self,
        method: &str,
        args: impl IntoArgs,
    ) -> Result<R, RuntimeError> {
        Ok(serde_json::from_value(self.call(method, args)?)?)
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Current value of `property`, pulled from the native side on first use
    pub fn get(&self, property: &str) -> Result<Value, RuntimeError> {
        let store = self.store(property)?;
        match store.value() {
            Some(value) => Ok(value),
            None => Ok(store.load(self.pull(property)?)),
        }
    }

    /// Subscribe to `property`.
    ///
    /// The callback receives the current value right away and every pushed
    /// value after that, always on the script thread.
    pub fn subscribe(
        &self,
        property: &str,
        callback: impl Fn(&Value) + Send + Sync + 'static,
    ) -> Result<SubscriptionId, RuntimeError> {
        let store = self.store(property)?.clone();
        let pulled = match store.value() {
            Some(value) => value,
            None => self.pull(property)?,
        };
        let callback: Subscriber = Arc::new(callback);
        self.host
            .run(move || {
                let current = store.load(pulled);
                let (id, _) = store.subscribe(callback.clone());
                callback(&current);
                id
            })
            .ok_or(RuntimeError::Stopped)
    }

    /// Remove a subscription
    pub fn unsubscribe(&self, property: &str, id: SubscriptionId) -> Result<bool, RuntimeError> {
        Ok(self.store(property)?.unsubscribe(id))
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Listen to `event`
    pub fn on(
        &self,
        event: &str,
        callback: impl Fn(&[Value]) + Send + Sync + 'static,
    ) -> Result<ListenerId, RuntimeError> {
        let listener: Listener = Arc::new(callback);
        Ok(self.emitter(event)?.on(listener))
    }

    /// Listen to the next firing of `event`
    pub fn once(
        &self,
        event: &str,
        callback: impl Fn(&[Value]) + Send + Sync + 'static,
    ) -> Result<ListenerId, RuntimeError> {
        let listener: Listener = Arc::new(callback);
        Ok(self.emitter(event)?.once(listener))
    }

    /// Remove a listener
    pub fn off(&self, event: &str, id: ListenerId) -> Result<bool, RuntimeError> {
        Ok(self.emitter(event)?.off(id))
    }

    // ========================================================================
    // Constants and lifecycle
    // ========================================================================

    /// Instance or class-level constant. Instance constants are read once.
    pub fn constant(&self, name: &str) -> Result<Value, RuntimeError> {
        match self.state.factory().member_kind(name) {
            Some(MemberKind::InstanceConstant) => {
                if let Some(value) = self.state.constant(name) {
                    return Ok(value);
                }
                let value = self
                    .host
                    .invoke(EntryPoint::Sync, &self.request(Some("const"), name, Vec::new()))?;
                self.state.set_constant(name, value.clone());
                Ok(value)
            }
            Some(MemberKind::StaticConstant) => self
                .state
                .constant(name)
                .ok_or_else(|| self.no_such(name, "constant")),
            _ => Err(self.no_such(name, "constant")),
        }
    }

    /// Read every instance constant
    pub fn load_constants(&self) -> Result<(), RuntimeError> {
        for name in &self.state.factory().manifest().instance_constants {
            self.constant(name)?;
        }
        Ok(())
    }

    /// Release the native object. Safe to call more than once.
    pub fn destroy(&self) -> Result<(), RuntimeError> {
        self.host.runtime().forget(self.handle().as_str());
        self.host
            .invoke(EntryPoint::Destroy, &[Value::from(self.handle().as_str())])?;
        Ok(())
    }

    fn pull(&self, property: &str) -> Result<Value, RuntimeError> {
        self.host
            .invoke(EntryPoint::Sync, &self.request(Some("prop"), property, Vec::new()))
    }

    fn request(&self, op: Option<&str>, member: &str, args: Vec<Value>) -> Vec<Value> {
        let mut request = Vec::with_capacity(args.len() + 4);
        request.push(Value::from(self.class_name()));
        request.push(Value::from(self.handle().as_str()));
        if let Some(op) = op {
            request.push(Value::from(op));
        }
        request.push(Value::from(member));
        request.extend(args);
        request
    }

    fn store(&self, property: &str) -> Result<&Arc<PropertyStore>, RuntimeError> {
        self.state
            .store(property)
            .ok_or_else(|| self.no_such(property, "property"))
    }

    fn emitter(&self, event: &str) -> Result<&Arc<EventEmitter>, RuntimeError> {
        self.state
            .emitter(event)
            .ok_or_else(|| self.no_such(event, "event"))
    }

    fn no_such(&self, member: &str, kind: &'static str) -> RuntimeError {
        RuntimeError::NoSuchMember {
            class: self.class_name().to_string(),
            member: member.to_string(),
            kind,
        }
    }
}

impl fmt::Debug for ProxyObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProxyObject").field(self.handle()).finish()
    }
}
