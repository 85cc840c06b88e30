//! Typed builder for class handlers
//!
//! Describes an exposed Rust type member by member and produces the
//! [`ClassHandler`] plus manifest the dispatcher needs.
//!
//! ```ignore
//! let handler = ClassBuilder::<MyObject>::new("MyObject")
//!     .default_constructor()
//!     .property("aBool", |o| &o.a_bool)
//!     .event("aEvent", |o| &o.a_event)
//!     .method("bar", |o, (pod,): (Pod,)| Ok(o.bar(pod)))
//!     .async_method("foo", |o, (s,): (String,)| o.foo(&s))
//!     .constant("version", |o| o.version)
//!     .static_constant("appversion", "1.0")
//!     .build();
//! ```
//!
//! Every member closure runs behind the invocation boundary, so argument
//! decoding errors, returned `NativeError`s and panics all become structured
//! responses.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Serialize;
use webbridge_sdk::convert::check_arity;
use webbridge_sdk::{
    BridgeError, ClassManifest, ErrorCode, FromArgs, Handle, IntoArgs, NativeError, NativeResult,
    Response, Value,
};

use super::handler::{ClassHandler, SyncOp};
use super::invoke::{invoke_and_serialize, CallResult};
use crate::context::BridgeContext;
use crate::event::Event;
use crate::notify::Notifier;
use crate::property::Property;
use crate::registry::ErasedObject;

type Constructor<T> = Arc<dyn Fn(&[Value]) -> CallResult<T> + Send + Sync>;
type Method<T> = Arc<dyn Fn(&T, &[Value]) -> CallResult<Value> + Send + Sync>;
type Getter<T> = Arc<dyn Fn(&T) -> CallResult<Value> + Send + Sync>;
type Wire<T> = Arc<dyn Fn(&T, &Notifier, &Handle) + Send + Sync>;
type Unwire<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Fluent description of an exposed class
pub struct ClassBuilder<T> {
    manifest: ClassManifest,
    constructor: Option<Constructor<T>>,
    methods: FxHashMap<String, Method<T>>,
    async_methods: FxHashMap<String, Method<T>>,
    properties: FxHashMap<String, Getter<T>>,
    constants: FxHashMap<String, Getter<T>>,
    wiring: Vec<(Wire<T>, Unwire<T>)>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ClassBuilder<T>
where
    T: Any + Send + Sync,
{
    /// Start describing `class_name`
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            manifest: ClassManifest::new(class_name),
            constructor: None,
            methods: FxHashMap::default(),
            async_methods: FxHashMap::default(),
            properties: FxHashMap::default(),
            constants: FxHashMap::default(),
            wiring: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Constructor taking positional arguments `A`
    pub fn constructor<A, F>(mut self, f: F) -> Self
    where
        A: FromArgs,
        F: Fn(A) -> NativeResult<T> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(move |args: &[Value]| -> CallResult<T> {
            let args = A::from_args(args)?;
            Ok(f(args)?)
        }));
        self
    }

    /// Zero-argument constructor via `Default`
    pub fn default_constructor(self) -> Self
    where
        T: Default,
    {
        self.constructor(|()| Ok(T::default()))
    }

    /// Expose a change-notifying property
    pub fn property<V, F>(mut self, name: &str, accessor: F) -> Self
    where
        V: Clone + PartialEq + Serialize + Send + Sync + 'static,
        F: Fn(&T) -> &Property<V> + Send + Sync + 'static,
    {
        let accessor = Arc::new(accessor);

        let get = accessor.clone();
        self.properties.insert(
            name.to_string(),
            Arc::new(move |obj: &T| encode_value(&get(obj).get())),
        );

        let member = name.to_string();
        let wire = accessor.clone();
        let unwire = accessor;
        self.wiring.push((
            Arc::new(move |obj: &T, notifier: &Notifier, handle: &Handle| {
                let notifier = notifier.clone();
                let handle = handle.clone();
                let member = member.clone();
                wire(obj).set_on_changed(move |value| notifier.notify(&handle, &member, value));
            }),
            Arc::new(move |obj: &T| unwire(obj).clear_on_changed()),
        ));

        push_unique(&mut self.manifest.properties, name);
        self
    }

    /// Expose an event whose arguments are the tuple `A`
    pub fn event<A, F>(mut self, name: &str, accessor: F) -> Self
    where
        A: IntoArgs + Send + Sync + 'static,
        F: Fn(&T) -> &Event<A> + Send + Sync + 'static,
    {
        let accessor = Arc::new(accessor);
        let member = name.to_string();
        let wire = accessor.clone();
        let unwire = accessor;
        self.wiring.push((
            Arc::new(move |obj: &T, notifier: &Notifier, handle: &Handle| {
                let notifier = notifier.clone();
                let handle = handle.clone();
                let member = member.clone();
                wire(obj).set_forwarder(move |args: &A| match args.into_args() {
                    Ok(args) => notifier.emit(&handle, &member, args),
                    Err(e) => log::warn!("dropping {}.{} emission: {}", handle, member, e),
                });
            }),
            Arc::new(move |obj: &T| unwire(obj).clear_forwarder()),
        ));

        push_unique(&mut self.manifest.events, name);
        self
    }

    /// Expose a method that runs on the calling thread
    pub fn method<A, R, F>(mut self, name: &str, f: F) -> Self
    where
        A: FromArgs,
        R: Serialize,
        F: Fn(&T, A) -> NativeResult<R> + Send + Sync + 'static,
    {
        self.methods.insert(name.to_string(), wrap_method(f));
        push_unique(&mut self.manifest.sync_methods, name);
        self
    }

    /// Expose a method that runs on the worker pool
    pub fn async_method<A, R, F>(mut self, name: &str, f: F) -> Self
    where
        A: FromArgs,
        R: Serialize,
        F: Fn(&T, A) -> NativeResult<R> + Send + Sync + 'static,
    {
        self.async_methods.insert(name.to_string(), wrap_method(f));
        push_unique(&mut self.manifest.async_methods, name);
        self
    }

    /// Expose a per-instance constant
    pub fn constant<V, F>(mut self, name: &str, f: F) -> Self
    where
        V: Serialize,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.constants
            .insert(name.to_string(), Arc::new(move |obj: &T| encode_value(&f(obj))));
        push_unique(&mut self.manifest.instance_constants, name);
        self
    }

    /// Expose a class-level constant, embedded in the manifest
    pub fn static_constant<V: Serialize>(mut self, name: &str, value: V) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.manifest.static_constants.insert(name.to_string(), value);
            }
            Err(e) => log::warn!(
                "static constant {}.{} does not serialize: {}",
                self.manifest.class_name,
                name,
                e
            ),
        }
        self
    }

    /// Member manifest so far
    pub fn manifest(&self) -> &ClassManifest {
        &self.manifest
    }

    /// Produce the handler set
    pub fn build(self) -> ClassHandler {
        let class: Arc<str> = Arc::from(self.manifest.class_name.as_str());
        let members = Arc::new(Members {
            class: class.clone(),
            methods: self.methods,
            async_methods: self.async_methods,
            properties: self.properties,
            constants: self.constants,
            static_constants: self.manifest.static_constants.clone(),
            wiring: self.wiring,
        });
        let constructor = self.constructor;

        let create = {
            let members = members.clone();
            move |ctx: &BridgeContext, args: &[Value]| -> Response {
                let function = format!("{}::constructor", members.class);
                invoke_and_serialize(ctx.errors(), &function, || {
                    let constructor = constructor.as_ref().ok_or_else(|| {
                        BridgeError::script(
                            ErrorCode::INVALID_ARGUMENT,
                            format!("{} cannot be constructed from script", members.class),
                        )
                    })?;
                    let object = Arc::new(constructor(args)?);
                    let handle = ctx.objects().register(object.clone(), &members.class);
                    members.attach(&object, ctx.notifier(), &handle);
                    log::debug!("created {}", handle);
                    Ok(handle)
                })
            }
        };

        let sync = {
            let members = members.clone();
            move |ctx: &BridgeContext, handle: &Handle, op: SyncOp, member: &str, args: &[Value]| {
                let function = format!("{}::{}", members.class, member);
                invoke_and_serialize(ctx.errors(), &function, || members.sync(ctx, handle, op, member, args))
            }
        };

        let invoke_async = {
            let members = members.clone();
            move |ctx: &BridgeContext, handle: &Handle, method: &str, args: &[Value]| {
                let function = format!("{}::{}", members.class, method);
                invoke_and_serialize(ctx.errors(), &function, || {
                    let body = members
                        .async_methods
                        .get(method)
                        .ok_or_else(|| members.unknown_member(method))?;
                    let object = ctx.objects().lookup::<T>(handle.as_str())?;
                    body(&object, args)
                })
            }
        };

        let attach = {
            let members = members.clone();
            move |ctx: &BridgeContext, handle: &Handle, object: &ErasedObject| {
                if let Ok(object) = object.clone().downcast::<T>() {
                    members.attach(&object, ctx.notifier(), handle);
                }
            }
        };

        let detach = move |object: &ErasedObject| {
            if let Ok(object) = object.clone().downcast::<T>() {
                members.detach(&object);
            }
        };

        ClassHandler::new(self.manifest, create, sync, invoke_async).with_lifecycle(attach, detach)
    }
}

struct Members<T> {
    class: Arc<str>,
    methods: FxHashMap<String, Method<T>>,
    async_methods: FxHashMap<String, Method<T>>,
    properties: FxHashMap<String, Getter<T>>,
    constants: FxHashMap<String, Getter<T>>,
    static_constants: serde_json::Map<String, Value>,
    wiring: Vec<(Wire<T>, Unwire<T>)>,
}

impl<T: Any + Send + Sync> Members<T> {
    fn sync(
        &self,
        ctx: &BridgeContext,
        handle: &Handle,
        op: SyncOp,
        member: &str,
        args: &[Value],
    ) -> CallResult<Value> {
        match op {
            SyncOp::Call => {
                let body = self.methods.get(member).ok_or_else(|| self.unknown_member(member))?;
                let object = ctx.objects().lookup::<T>(handle.as_str())?;
                body(&object, args)
            }
            SyncOp::Prop => {
                let get = self.properties.get(member).ok_or_else(|| self.unknown_member(member))?;
                check_arity(args, 0)?;
                let object = ctx.objects().lookup::<T>(handle.as_str())?;
                get(&object)
            }
            SyncOp::Const => {
                check_arity(args, 0)?;
                if let Some(get) = self.constants.get(member) {
                    let object = ctx.objects().lookup::<T>(handle.as_str())?;
                    return get(&object);
                }
                self.static_constants
                    .get(member)
                    .cloned()
                    .ok_or_else(|| self.unknown_member(member).into())
            }
        }
    }

    fn attach(&self, object: &T, notifier: &Notifier, handle: &Handle) {
        for (wire, _) in &self.wiring {
            wire(object, notifier, handle);
        }
    }

    fn detach(&self, object: &T) {
        for (_, unwire) in &self.wiring {
            unwire(object);
        }
    }

    fn unknown_member(&self, member: &str) -> BridgeError {
        BridgeError::script(
            ErrorCode::UNKNOWN_MEMBER,
            format!("{} has no member {}", self.class, member),
        )
    }
}

fn wrap_method<T, A, R, F>(f: F) -> Method<T>
where
    T: 'static,
    A: FromArgs,
    R: Serialize,
    F: Fn(&T, A) -> NativeResult<R> + Send + Sync + 'static,
{
    Arc::new(move |object: &T, args: &[Value]| -> CallResult<Value> {
        let args = A::from_args(args)?;
        let result = f(object, args)?;
        encode_value(&result)
    })
}

fn encode_value<V: Serialize + ?Sized>(value: &V) -> CallResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| NativeError::msg(format!("failed to encode result: {}", e)).into())
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|m| m == name) {
        list.push(name.to_string());
    }
}
