//! Script-side event emitter
//!
//! The native side keeps a single forwarder per event; fan-out to any number
//! of listeners happens here. Listeners run in registration order. A `once`
//! listener is removed before the dispatch that fires it, so a listener that
//! re-emits cannot see itself again.

use std::sync::Arc;

use parking_lot::Mutex;
use webbridge_sdk::Value;

/// Listener callback, receiving the positional event arguments
pub type Listener = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Token returned by [`EventEmitter::on`] and [`EventEmitter::once`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registered {
    id: u64,
    once: bool,
    callback: Listener,
}

#[derive(Default)]
struct EmitterState {
    listeners: Vec<Registered>,
    next_id: u64,
}

/// Multi-listener mirror of one (handle, event) pair
pub struct EventEmitter {
    name: String,
    state: Mutex<EmitterState>,
}

impl EventEmitter {
    /// Create an emitter with no listeners
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(EmitterState::default()),
        }
    }

    /// Event name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Listen until removed
    pub fn on(&self, callback: Listener) -> ListenerId {
        self.add(callback, false)
    }

    /// Listen for the next dispatch only
    pub fn once(&self, callback: Listener) -> ListenerId {
        self.add(callback, true)
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut state = self.state.lock();
        let before = state.listeners.len();
        state.listeners.retain(|l| l.id != id.0);
        state.listeners.len() != before
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    /// Deliver `args` to every listener
    pub fn dispatch(&self, args: &[Value]) {
        let current: Vec<Listener> = {
            let mut state = self.state.lock();
            let current = state.listeners.iter().map(|l| l.callback.clone()).collect();
            state.listeners.retain(|l| !l.once);
            current
        };
        for callback in current {
            callback(args);
        }
    }

    fn add(&self, callback: Listener, once: bool) -> ListenerId {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.push(Registered { id, once, callback });
        ListenerId(id)
    }
}
