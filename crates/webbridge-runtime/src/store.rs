//! Script-side mirror of a native property
//!
//! Follows the store contract of the injected runtime: a store that has never
//! received a value is loaded once on demand, after which only pushes from
//! the native side change it. A push always wins over a pull that was in
//! flight when it arrived.

use std::sync::Arc;

use parking_lot::Mutex;
use webbridge_sdk::Value;

/// Subscriber callback
pub type Subscriber = Arc<dyn Fn(&Value) + Send + Sync>;

/// Token returned by [`PropertyStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct StoreState {
    value: Option<Value>,
    subscribers: Vec<(u64, Subscriber)>,
    next_id: u64,
}

/// Reactive mirror of one (handle, property) pair
pub struct PropertyStore {
    name: String,
    state: Mutex<StoreState>,
}

impl PropertyStore {
    /// Create an unloaded store
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a value has been pulled or pushed
    pub fn is_loaded(&self) -> bool {
        self.state.lock().value.is_some()
    }

    /// Current value, if loaded
    pub fn value(&self) -> Option<Value> {
        self.state.lock().value.clone()
    }

    /// Store a pulled value unless a push got there first.
    ///
    /// Returns the value the store now holds.
    pub fn load(&self, pulled: Value) -> Value {
        let mut state = self.state.lock();
        state.value.get_or_insert(pulled).clone()
    }

    /// Register `callback`. Returns the token and the current value, if any.
    pub fn subscribe(&self, callback: Subscriber) -> (SubscriptionId, Option<Value>) {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.subscribers.push((id, callback));
        (SubscriptionId(id), state.value.clone())
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.lock();
        let before = state.subscribers.len();
        state.subscribers.retain(|(sid, _)| *sid != id.0);
        state.subscribers.len() != before
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    /// Apply a pushed value and fan it out to every subscriber
    pub fn notify(&self, value: Value) {
        let subscribers: Vec<Subscriber> = {
            let mut state = self.state.lock();
            state.value = Some(value.clone());
            state.subscribers.iter().map(|(_, s)| s.clone()).collect()
        };
        for subscriber in subscribers {
            subscriber(&value);
        }
    }
}
