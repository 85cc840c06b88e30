//! Native → script snippet codec.
//!
//! Every push from the native side is a call of a runtime function with
//! JSON-encoded arguments:
//!
//! ```text
//! window.__webbridge_notify("MyObject_3","aBool",true)
//! window.__webbridge_emit("MyObject_3","aEvent",42,false)
//! ```
//!
//! Because every argument is JSON, the argument list is itself the body of a
//! JSON array, which is how [`ScriptCall::parse`] reads snippets back.

use serde_json::Value;

use crate::handle::Handle;
use crate::manifest::ClassManifest;

/// Default prefix of the runtime's global functions
pub const DEFAULT_NAMESPACE: &str = "__webbridge";

/// A call into the script runtime
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCall {
    /// Property `member` of `handle` changed to `value`
    Notify {
        /// Object handle
        handle: Handle,
        /// Property name
        member: String,
        /// New value
        value: Value,
    },
    /// Event `event` of `handle` fired with `args`
    Emit {
        /// Object handle
        handle: Handle,
        /// Event name
        event: String,
        /// Positional event arguments
        args: Vec<Value>,
    },
    /// Define the class factory for a manifest
    DefineClass {
        /// Class members
        manifest: ClassManifest,
    },
    /// Expose an existing native object as a script global
    Publish {
        /// Class members
        manifest: ClassManifest,
        /// Global variable name
        var_name: String,
        /// Object handle
        handle: Handle,
    },
}

impl ScriptCall {
    fn function(&self) -> &'static str {
        match self {
            ScriptCall::Notify { .. } => "notify",
            ScriptCall::Emit { .. } => "emit",
            ScriptCall::DefineClass { .. } => "createClass",
            ScriptCall::Publish { .. } => "publish",
        }
    }

    fn arguments(&self) -> Result<Vec<Value>, serde_json::Error> {
        Ok(match self {
            ScriptCall::Notify {
                handle,
                member,
                value,
            } => vec![
                Value::from(handle.as_str()),
                Value::from(member.as_str()),
                value.clone(),
            ],
            ScriptCall::Emit {
                handle,
                event,
                args,
            } => {
                let mut all = Vec::with_capacity(args.len() + 2);
                all.push(Value::from(handle.as_str()));
                all.push(Value::from(event.as_str()));
                all.extend(args.iter().cloned());
                all
            }
            ScriptCall::DefineClass { manifest } => vec![serde_json::to_value(manifest)?],
            ScriptCall::Publish {
                manifest,
                var_name,
                handle,
            } => vec![
                serde_json::to_value(manifest)?,
                Value::from(var_name.as_str()),
                Value::from(handle.as_str()),
            ],
        })
    }

    /// Render as an evaluable snippet under `namespace`.
    pub fn to_script(&self, namespace: &str) -> Result<String, serde_json::Error> {
        let args = self
            .arguments()?
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!(
            "window.{}_{}({})",
            namespace,
            self.function(),
            args.join(",")
        ))
    }

    /// Parse a snippet produced by [`ScriptCall::to_script`].
    ///
    /// Returns `None` for anything else, including arbitrary script text.
    pub fn parse(script: &str, namespace: &str) -> Option<ScriptCall> {
        let rest = script.trim().strip_prefix("window.")?;
        let rest = rest.strip_prefix(namespace)?.strip_prefix('_')?;
        let open = rest.find('(')?;
        let function = &rest[..open];
        let body = rest[open + 1..].trim_end().trim_end_matches(';').strip_suffix(')')?;
        let args: Vec<Value> = serde_json::from_str(&format!("[{}]", body)).ok()?;
        let mut args = args.into_iter();

        let call = match function {
            "notify" => ScriptCall::Notify {
                handle: Handle::from_raw(args.next()?.as_str()?),
                member: args.next()?.as_str()?.to_string(),
                value: args.next()?,
            },
            "emit" => ScriptCall::Emit {
                handle: Handle::from_raw(args.next()?.as_str()?),
                event: args.next()?.as_str()?.to_string(),
                args: args.by_ref().collect(),
            },
            "createClass" => ScriptCall::DefineClass {
                manifest: serde_json::from_value(args.next()?).ok()?,
            },
            "publish" => ScriptCall::Publish {
                manifest: serde_json::from_value(args.next()?).ok()?,
                var_name: args.next()?.as_str()?.to_string(),
                handle: Handle::from_raw(args.next()?.as_str()?),
            },
            _ => return None,
        };
        if args.next().is_some() {
            return None;
        }
        Some(call)
    }
}
