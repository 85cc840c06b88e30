//! End-to-end tests for the bridge
//!
//! These tests drive a real `Bridge` through the `HeadlessHost`: calls go
//! through the four bound entry points on the script thread, and pushes come
//! back as evaluated snippets routed into the runtime mirror.

mod fixtures;
mod harness;

mod concurrency;
mod errors;
mod events;
mod lifecycle;
mod marshalling;
mod properties;
