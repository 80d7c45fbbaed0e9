//! Demo component engine.
//!
//! Stands in for a real rendering engine: it records which root components
//! are mounted and queues messages arriving from the page for the app loop
//! to answer. Mount instructions are delivered to the page as JSON over
//! the message channel once the page reports it is ready.

use std::collections::VecDeque;
use std::sync::Mutex;

use tracing::{debug, info};
use trellis_webview::{ComponentEngine, EngineError, RootComponent};

/// A recorded mount: selector plus component type name.
#[derive(Debug, Clone)]
pub struct Mount {
    pub selector: String,
    pub component_type: String,
    pub parameters: Option<serde_json::Value>,
}

#[derive(Default)]
pub struct DemoEngine {
    mounts: Mutex<Vec<Mount>>,
    inbound: Mutex<VecDeque<String>>,
}

impl DemoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all messages the page has sent since the last call.
    pub fn take_messages(&self) -> Vec<String> {
        let mut inbound = self.inbound.lock().unwrap();
        inbound.drain(..).collect()
    }

    /// Currently mounted components, in mount order.
    pub fn mounts(&self) -> Vec<Mount> {
        self.mounts.lock().unwrap().clone()
    }
}

impl ComponentEngine for DemoEngine {
    fn add_root_component(&self, component: &RootComponent) -> Result<(), EngineError> {
        info!(
            "mounting component \"{}\" at {}",
            component.component_type(),
            component.selector()
        );
        self.mounts.lock().unwrap().push(Mount {
            selector: component.selector().to_string(),
            component_type: component.component_type().name().to_string(),
            parameters: component
                .parameters()
                .map(|p| serde_json::to_value(p).unwrap_or(serde_json::Value::Null)),
        });
        Ok(())
    }

    fn remove_root_component(&self, selector: &str) -> Result<(), EngineError> {
        info!("unmounting component at {selector}");
        // Unknown selectors are tolerated; removal is idempotent here.
        self.mounts.lock().unwrap().retain(|m| m.selector != selector);
        Ok(())
    }

    fn dispatch_host_message(&self, base_uri: &str, message: &str) {
        debug!("page message via {base_uri}: {message}");
        self.inbound.lock().unwrap().push_back(message.to_string());
    }
}
