//! Traits for marshalling positional JSON arguments to and from Rust tuples.
//!
//! Exposed members take their parameters as a tuple, decoded strictly from
//! the JSON array the script side sent:
//!
//! ```ignore
//! let (count, label): (i32, String) = FromArgs::from_args(&args)?;
//! ```
//!
//! Each element is decoded to its static type in order. A missing element,
//! a surplus element, or a type mismatch is a script-origin error that names
//! the failing parameter.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{BridgeError, BridgeResult, ErrorCode};

/// Decode a positional argument list into a typed tuple.
pub trait FromArgs: Sized {
    /// Number of parameters the tuple expects
    const ARITY: usize;

    /// Decode `args`, which must hold exactly `ARITY` elements.
    fn from_args(args: &[Value]) -> BridgeResult<Self>;
}

/// Encode a tuple of values as a positional JSON argument list.
pub trait IntoArgs {
    /// Encode each element in order
    fn into_args(&self) -> BridgeResult<Vec<Value>>;
}

/// Decode the argument at `index`.
///
/// Missing elements map to `JSON_ACCESS`, mistyped ones to `JSON_TYPE`.
pub fn arg<T: DeserializeOwned>(args: &[Value], index: usize) -> BridgeResult<T> {
    let value = args.get(index).ok_or_else(|| {
        BridgeError::script(
            ErrorCode::JSON_ACCESS,
            format!("missing argument {} (got {} arguments)", index, args.len()),
        )
    })?;
    T::deserialize(value).map_err(|e| {
        BridgeError::script(
            ErrorCode::JSON_TYPE,
            format!(
                "argument {}: expected {}, {}",
                index,
                short_type_name::<T>(),
                e
            ),
        )
    })
}

/// Check that at most `expected` arguments were supplied. Missing ones are
/// reported by [`arg`] as they are read.
pub fn check_arity(args: &[Value], expected: usize) -> BridgeResult<()> {
    if args.len() > expected {
        return Err(BridgeError::script(
            ErrorCode::INVALID_ARGUMENT,
            format!("expected {} arguments, got {}", expected, args.len()),
        ));
    }
    Ok(())
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    match full.find('<') {
        Some(idx) => full[..idx].rsplit("::").next().unwrap_or(full),
        None => full.rsplit("::").next().unwrap_or(full),
    }
}

fn encode<T: Serialize>(index: usize, value: &T) -> BridgeResult<Value> {
    serde_json::to_value(value).map_err(|e| {
        BridgeError::native(
            ErrorCode::RUNTIME,
            format!("failed to encode argument {}: {}", index, e),
        )
    })
}

// ============================================================================
// Tuple implementations
// ============================================================================

impl FromArgs for () {
    const ARITY: usize = 0;

    fn from_args(args: &[Value]) -> BridgeResult<Self> {
        check_arity(args, 0)
    }
}

impl IntoArgs for () {
    fn into_args(&self) -> BridgeResult<Vec<Value>> {
        Ok(Vec::new())
    }
}

macro_rules! count {
    () => { 0usize };
    ($head:ident $($tail:ident)*) => { 1usize + count!($($tail)*) };
}

macro_rules! impl_args_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: DeserializeOwned),+> FromArgs for ($($name,)+) {
            const ARITY: usize = count!($($name)+);

            fn from_args(args: &[Value]) -> BridgeResult<Self> {
                check_arity(args, Self::ARITY)?;
                Ok(($(arg::<$name>(args, $idx)?,)+))
            }
        }

        impl<$($name: Serialize),+> IntoArgs for ($($name,)+) {
            fn into_args(&self) -> BridgeResult<Vec<Value>> {
                Ok(vec![$(encode($idx, &self.$idx)?),+])
            }
        }
    };
}

impl_args_tuple!(A: 0);
impl_args_tuple!(A: 0, B: 1);
impl_args_tuple!(A: 0, B: 1, C: 2);
impl_args_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_args_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_args_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_args_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_args_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
