//! Class factories built from manifests

use std::sync::Arc;

use webbridge_sdk::{ClassManifest, Handle, Value};

use crate::proxy::ProxyState;

/// What a member name refers to on a proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Reactive property store
    Property,
    /// Event emitter
    Event,
    /// Method answered on the calling thread
    SyncMethod,
    /// Method answered by the worker pool
    AsyncMethod,
    /// Per-instance constant
    InstanceConstant,
    /// Class-level constant
    StaticConstant,
}

/// Script-side factory for one exposed class
#[derive(Debug)]
pub struct ClassFactory {
    manifest: ClassManifest,
}

impl ClassFactory {
    /// Factory for `manifest`
    pub fn new(manifest: ClassManifest) -> Self {
        Self { manifest }
    }

    /// Class name
    pub fn class_name(&self) -> &str {
        &self.manifest.class_name
    }

    /// Member manifest
    pub fn manifest(&self) -> &ClassManifest {
        &self.manifest
    }

    /// Classify `name`. Properties shadow methods of the same name.
    pub fn member_kind(&self, name: &str) -> Option<MemberKind> {
        let has = |list: &[String]| list.iter().any(|m| m == name);
        let m = &self.manifest;
        if has(&m.properties) {
            Some(MemberKind::Property)
        } else if has(&m.events) {
            Some(MemberKind::Event)
        } else if has(&m.sync_methods) {
            Some(MemberKind::SyncMethod)
        } else if has(&m.async_methods) {
            Some(MemberKind::AsyncMethod)
        } else if has(&m.instance_constants) {
            Some(MemberKind::InstanceConstant)
        } else if m.static_constants.contains_key(name) {
            Some(MemberKind::StaticConstant)
        } else {
            None
        }
    }

    /// Class-level constant
    pub fn static_constant(&self, name: &str) -> Option<&Value> {
        self.manifest.static_constants.get(name)
    }

    /// Fresh proxy state for `handle`, with one store per property and one
    /// emitter per event
    pub fn instantiate(self: &Arc<Self>, handle: Handle) -> ProxyState {
        ProxyState::new(handle, self.clone())
    }
}
