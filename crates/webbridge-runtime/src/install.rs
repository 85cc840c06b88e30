//! Wiring a bridge into its host

use std::sync::Arc;

use webbridge_engine::{Bridge, BridgeConfig};

use crate::error::RuntimeError;
use crate::headless::HeadlessHost;
use crate::js::runtime_script;

/// Inject the runtime, bind the entry points and define every registered
/// class.
///
/// The runtime is registered first so it exists before any class snippet
/// runs. Classes registered afterwards are defined as they arrive.
pub fn install(bridge: &Arc<Bridge>) {
    let namespace = &bridge.config().snippet_namespace;
    bridge.host().init(&runtime_script(namespace));
    bridge.connect();
    log::info!("webbridge runtime installed under {}", namespace);
}

/// Start a headless host and an installed bridge on top of it.
///
/// Callers of the host wait for every accepted request to complete.
pub fn start_headless(
    config: BridgeConfig,
) -> Result<(Arc<HeadlessHost>, Arc<Bridge>), RuntimeError> {
    let host = HeadlessHost::start(&config.snippet_namespace, None)?;
    let bridge = Arc::new(Bridge::new(host.clone(), config));
    install(&bridge);
    Ok((host, bridge))
}
