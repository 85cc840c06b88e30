//! Class dispatch
//!
//! Four universal entry points serve every exposed type. They look up the
//! type's [`ClassHandler`] in the [`DispatcherRegistry`] and delegate; the
//! handler decodes arguments, invokes the member behind the
//! [`invoke`] boundary and encodes the [`Response`](webbridge_sdk::Response).

mod class;
mod handler;
mod hooks;
pub mod invoke;
mod registry;

pub use class::ClassBuilder;
pub use handler::{AsyncFn, AttachFn, ClassHandler, CreateFn, DetachFn, SyncFn, SyncOp};
pub use hooks::{ErrorHook, ErrorHooks};
pub use invoke::{CallError, CallResult};
pub use registry::DispatcherRegistry;
