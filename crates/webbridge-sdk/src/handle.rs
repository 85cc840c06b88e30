//! Opaque object handles

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque string identifying a live native object to the script side.
///
/// Generated handles have the form `{type_name}_{counter}`, where the counter
/// is shared by all types so two handles never collide within a process.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(Arc<str>);

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(0);

impl Handle {
    /// Generate a fresh handle for an object of `type_name`
    pub fn generate(type_name: &str) -> Self {
        let id = NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed);
        Handle(Arc::from(format!("{}_{}", type_name, id)))
    }

    /// Wrap a handle string received from the script side
    pub fn from_raw(raw: impl AsRef<str>) -> Self {
        Handle(Arc::from(raw.as_ref()))
    }

    /// Handle text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Type name prefix of a generated handle
    pub fn type_prefix(&self) -> Option<&str> {
        let (prefix, counter) = self.0.rsplit_once('_')?;
        counter.parse::<u64>().ok().map(|_| prefix)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Handle {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for Handle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Handle::from_raw(raw))
    }
}
