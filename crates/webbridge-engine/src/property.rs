//! Thread-safe change-notifying value holder
//!
//! A `Property<T>` holds one value and at most one change callback. Reads take
//! a shared lock and may run concurrently with each other. A write that does
//! not change the value (by `PartialEq`) is a no-op and fires nothing.
//!
//! The callback is always invoked with the value lock released, so it may
//! read the property (or even write it) without deadlocking. Writers are
//! serialized on a separate ordering lock held across the callback, which
//! keeps notifications in write order.

use std::fmt;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};

/// Callback invoked with the new value after a change
pub type ChangeCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct PropertyState<T> {
    value: T,
    on_changed: Option<ChangeCallback<T>>,
}

/// A native-owned value mirrored to the script side
pub struct Property<T> {
    state: RwLock<PropertyState<T>>,
    /// Serializes writers across the callback
    order: ReentrantMutex<()>,
}

impl<T> Property<T>
where
    T: Clone + PartialEq + Send + Sync,
{
    /// Create a property holding `initial`
    pub fn new(initial: T) -> Self {
        Self {
            state: RwLock::new(PropertyState {
                value: initial,
                on_changed: None,
            }),
            order: ReentrantMutex::new(()),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.state.read().value.clone()
    }

    /// Borrow the current value under the shared lock
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.state.read().value)
    }

    /// Store `value`. Returns whether the value changed.
    ///
    /// Values that compare unequal to themselves (NaN) always count as a
    /// change.
    pub fn set(&self, value: T) -> bool {
        let _order = self.order.lock();

        let (callback, snapshot) = {
            let mut state = self.state.write();
            if state.value == value {
                return false;
            }
            state.value = value;
            match state.on_changed.clone() {
                Some(cb) => (Some(cb), Some(state.value.clone())),
                None => (None, None),
            }
        };

        if let (Some(cb), Some(value)) = (callback, snapshot) {
            cb(&value);
        }
        true
    }

    /// Modify a copy of the value and store it.
    ///
    /// Atomic with respect to other writers.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let _order = self.order.lock();
        let mut next = self.get();
        f(&mut next);
        self.set(next)
    }

    /// Install the change callback, replacing any previous one
    pub fn set_on_changed(&self, callback: impl Fn(&T) + Send + Sync + 'static) {
        self.state.write().on_changed = Some(Arc::new(callback));
    }

    /// Remove the change callback
    pub fn clear_on_changed(&self) {
        self.state.write().on_changed = None;
    }

    /// Whether a change callback is installed
    pub fn has_on_changed(&self) -> bool {
        self.state.read().on_changed.is_some()
    }
}

impl<T> Default for Property<T>
where
    T: Clone + PartialEq + Send + Sync + Default,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&self.state.read().value).finish()
    }
}
