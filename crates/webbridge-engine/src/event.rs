//! Single-forwarder signal
//!
//! An `Event<A>` has one forwarding slot, not a subscriber list. Fan-out to
//! multiple listeners happens on the script side; the native side forwards
//! each emission exactly once. Emitting before a forwarder is attached is a
//! silent no-op, because the script side subscribes asynchronously.
//!
//! `A` is the argument tuple, e.g. `Event<(i32, bool)>`.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Forwarding function invoked on every emission
pub type Forwarder<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// A native-owned event mirrored to the script side
pub struct Event<A> {
    forwarder: RwLock<Option<Forwarder<A>>>,
}

impl<A> Event<A> {
    /// Create an event with no forwarder
    pub fn new() -> Self {
        Self {
            forwarder: RwLock::new(None),
        }
    }

    /// Fire the event. Does nothing if no forwarder is attached.
    pub fn emit(&self, args: A) {
        let forwarder = self.forwarder.read().clone();
        if let Some(forward) = forwarder {
            forward(&args);
        }
    }

    /// Attach the forwarder, replacing any previous one
    pub fn set_forwarder(&self, forwarder: impl Fn(&A) + Send + Sync + 'static) {
        *self.forwarder.write() = Some(Arc::new(forwarder));
    }

    /// Detach the forwarder
    pub fn clear_forwarder(&self) {
        *self.forwarder.write() = None;
    }

    /// Whether a forwarder is attached
    pub fn has_forwarder(&self) -> bool {
        self.forwarder.read().is_some()
    }
}

impl<A> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("forwarder", &self.has_forwarder())
            .finish()
    }
}
