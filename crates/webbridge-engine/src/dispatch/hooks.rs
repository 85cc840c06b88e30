//! Optional error hook for native-origin failures

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use webbridge_sdk::BridgeError;

/// Hook that may enrich a native-origin error before it is returned
pub type ErrorHook = Arc<dyn Fn(&mut BridgeError) + Send + Sync>;

/// Slot for the application's error hook.
///
/// Owned by the bridge; every native-origin error passes through
/// [`apply`](ErrorHooks::apply). With no hook installed errors are returned
/// unchanged.
#[derive(Default)]
pub struct ErrorHooks {
    hook: RwLock<Option<ErrorHook>>,
}

impl ErrorHooks {
    /// Create an empty hook slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `hook`, replacing any previous one
    pub fn set(&self, hook: impl Fn(&mut BridgeError) + Send + Sync + 'static) {
        *self.hook.write() = Some(Arc::new(hook));
    }

    /// Remove the hook
    pub fn clear(&self) {
        *self.hook.write() = None;
    }

    /// Whether a hook is installed
    pub fn is_set(&self) -> bool {
        self.hook.read().is_some()
    }

    /// Run the hook on `err`.
    ///
    /// A panicking hook leaves the error as it was before the call.
    pub fn apply(&self, err: &mut BridgeError) {
        let hook = self.hook.read().clone();
        let Some(hook) = hook else {
            return;
        };

        let mut enriched = err.clone();
        match panic::catch_unwind(AssertUnwindSafe(|| hook(&mut enriched))) {
            Ok(()) => *err = enriched,
            Err(_) => log::error!("error hook panicked while handling {}", err),
        }
    }
}
