//! Native → script push channel
//!
//! Property changes and event emissions can happen on any native thread. The
//! notifier renders them as snippets and hands them to the host's dispatch
//! queue, so evaluation always happens on the script-engine thread and in
//! the order the pushes were made.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use webbridge_sdk::{Handle, ScriptCall, ScriptHost, Value};

/// Handle to the script side for pushes
#[derive(Clone)]
pub struct Notifier {
    host: Arc<dyn ScriptHost>,
    namespace: Arc<str>,
}

impl Notifier {
    /// Create a notifier evaluating snippets under `namespace`
    pub fn new(host: Arc<dyn ScriptHost>, namespace: &str) -> Self {
        Self {
            host,
            namespace: Arc::from(namespace),
        }
    }

    /// Runtime function prefix
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Underlying host
    pub fn host(&self) -> &Arc<dyn ScriptHost> {
        &self.host
    }

    /// Push a property change
    pub fn notify<V: Serialize + ?Sized>(&self, handle: &Handle, member: &str, value: &V) {
        match serde_json::to_value(value) {
            Ok(value) => self.push(&ScriptCall::Notify {
                handle: handle.clone(),
                member: member.to_string(),
                value,
            }),
            Err(e) => log::warn!(
                "dropping change of {}.{}: value does not serialize: {}",
                handle,
                member,
                e
            ),
        }
    }

    /// Push an event emission
    pub fn emit(&self, handle: &Handle, event: &str, args: Vec<Value>) {
        self.push(&ScriptCall::Emit {
            handle: handle.clone(),
            event: event.to_string(),
            args,
        });
    }

    /// Render `call` and evaluate it on the script thread
    pub fn push(&self, call: &ScriptCall) {
        let script = match call.to_script(&self.namespace) {
            Ok(script) => script,
            Err(e) => {
                log::warn!("dropping script call: {}", e);
                return;
            }
        };
        let host = self.host.clone();
        self.host.dispatch(Box::new(move || host.eval(&script)));
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("namespace", &self.namespace)
            .finish()
    }
}
