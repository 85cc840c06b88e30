//! `MyObject`, the demo class every scenario runs against

use serde::{Deserialize, Serialize};
use webbridge_engine::{ClassBuilder, ClassHandler, Event, Property};
use webbridge_sdk::convert::{arg, check_arity};
use webbridge_sdk::{BridgeResult, FromArgs, NativeError, NativeResult, Value};

/// Static constant exposed on the class
pub const APP_VERSION: &str = "app version";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Idle,
    Running,
    Completed,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    pub a: u32,
    pub b: u64,
}

pub struct MyObject {
    pub a_bool: Property<bool>,
    pub str_prop: Property<String>,
    pub counter: Property<i32>,
    pub numbers: Property<Vec<i32>>,
    pub status: Property<Status>,
    pub pod: Property<Pod>,
    pub a_event: Event<(i32, bool)>,
    version: String,
}

impl MyObject {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            a_bool: Property::default(),
            str_prop: Property::default(),
            counter: Property::default(),
            numbers: Property::default(),
            status: Property::default(),
            pod: Property::default(),
            a_event: Event::new(),
            version: version.into(),
        }
    }

    pub fn foo(&self, val: String) {
        self.str_prop.set(val);
        self.a_event.emit((42, false));
    }

    pub fn bar(&self) -> bool {
        self.pod.set(Pod {
            a: 42,
            b: 123_456_789,
        });
        !self.a_bool.get()
    }

    pub fn test_vectors(&self) {
        self.status.set(Status::Running);
        let fibonacci = vec![1, 1, 2, 3, 5, 8, 13, 21];
        let len = fibonacci.len();
        self.numbers.set(fibonacci);
        self.str_prop
            .set(format!("Vector mit {} Fibonacci-Zahlen", len));
        self.counter.set(len as i32);
        self.status.set(Status::Completed);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn multi_param_test(
        &self,
        int_value: i32,
        bool_value: bool,
        str_value: String,
        vec_value: Vec<i32>,
        status_value: Status,
        pod_value: Pod,
    ) -> String {
        let result = format!(
            "multiParamTest called with: int={}, bool={}, str='{}', vec.size={}, status={:?}, pod.a={}, pod.b={}",
            int_value,
            bool_value,
            str_value,
            vec_value.len(),
            status_value,
            pod_value.a,
            pod_value.b
        );
        self.counter.set(int_value);
        self.a_bool.set(bool_value);
        self.str_prop.set(str_value);
        self.numbers.set(vec_value);
        self.status.set(status_value);
        self.pod.set(pod_value);
        result
    }
}

/// Constructor arguments: an optional version string
pub struct VersionArg(pub String);

impl FromArgs for VersionArg {
    const ARITY: usize = 1;

    fn from_args(args: &[Value]) -> BridgeResult<Self> {
        check_arity(args, Self::ARITY)?;
        if args.is_empty() {
            return Ok(VersionArg("unknown".to_string()));
        }
        Ok(VersionArg(arg(args, 0)?))
    }
}

pub fn my_object_class() -> ClassHandler {
    ClassBuilder::<MyObject>::new("MyObject")
        .constructor(|VersionArg(version)| Ok(MyObject::new(version)))
        .property("aBool", |o| &o.a_bool)
        .property("strProp", |o| &o.str_prop)
        .property("counter", |o| &o.counter)
        .property("numbers", |o| &o.numbers)
        .property("status", |o| &o.status)
        .property("pod", |o| &o.pod)
        .event("aEvent", |o| &o.a_event)
        .async_method("foo", |o, (val,): (String,)| {
            o.foo(val);
            Ok(())
        })
        .method("bar", |o, ()| Ok(o.bar()))
        .method("testVectors", |o, ()| {
            o.test_vectors();
            Ok(())
        })
        .method("throwError", |_, ()| -> NativeResult<()> {
            Err(NativeError::msg("Test error"))
        })
        .method(
            "multiParamTest",
            |o, (i, b, s, v, st, p): (i32, bool, String, Vec<i32>, Status, Pod)| {
                Ok(o.multi_param_test(i, b, s, v, st, p))
            },
        )
        .constant("version", |o| o.version.clone())
        .static_constant("appversion", APP_VERSION)
        .build()
}

/// Small second class, registered after installation in some tests
#[derive(Default)]
pub struct Greeter {
    pub greeting: Property<String>,
}

pub fn greeter_class() -> ClassHandler {
    ClassBuilder::<Greeter>::new("Greeter")
        .default_constructor()
        .property("greeting", |g| &g.greeting)
        .method("greet", |g, (name,): (String,)| {
            let text = format!("Hello, {}!", name);
            g.greeting.set(text.clone());
            Ok(text)
        })
        .async_method("greetSlowly", |g, (name, delay_ms): (String, u64)| {
            std::thread::sleep(std::time::Duration::from_millis(delay_ms));
            let text = format!("Hello at last, {}!", name);
            g.greeting.set(text.clone());
            Ok(text)
        })
        .build()
}
