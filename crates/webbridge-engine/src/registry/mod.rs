//! Ownership of exposed native objects

mod objects;

pub use objects::{ErasedObject, ObjectEntry, ObjectRegistry};
