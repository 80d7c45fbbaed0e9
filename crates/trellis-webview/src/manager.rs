//! Webview management: navigation, message dispatch, engine forwarding.
//!
//! [`WebViewManager`] performs every runtime operation against an abstract
//! [`WebViewWidget`] surface, so the glue logic stays independent of the
//! native backend (wry in production, a recording stub in tests).

use std::sync::Arc;

use tracing::debug;
use trellis_common::WebViewError;

use crate::bridge::BASE_URI;
use crate::components::RootComponent;
use crate::engine::{ComponentEngine, EngineError};
use crate::ipc;

/// The runtime surface of the native webview widget.
///
/// Registration concerns (URI scheme, message channel, bootstrap script,
/// devtools flag) are build-time properties of the backend and are wired
/// exactly once when the widget is created.
pub trait WebViewWidget {
    /// Load the given absolute URI as the top-level document.
    fn load_uri(&self, uri: &str) -> Result<(), WebViewError>;

    /// Evaluate JavaScript in the page context, fire-and-forget.
    fn evaluate_script(&self, script: &str) -> Result<(), WebViewError>;

    /// Resize the widget within its parent window.
    fn set_bounds(&self, width: u32, height: u32) -> Result<(), WebViewError>;
}

/// Resolve a start path against the application base URI.
///
/// Absolute URIs pass through; anything else is joined onto
/// `app://localhost`.
pub fn resolve_app_uri(path: &str) -> String {
    if path.contains("://") {
        return path.to_string();
    }
    let base = BASE_URI.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Coordinates one webview widget with the engine contract.
pub struct WebViewManager {
    widget: Box<dyn WebViewWidget>,
    engine: Arc<dyn ComponentEngine>,
    disposed: bool,
}

impl WebViewManager {
    pub fn new(widget: Box<dyn WebViewWidget>, engine: Arc<dyn ComponentEngine>) -> Self {
        Self {
            widget,
            engine,
            disposed: false,
        }
    }

    /// Navigate the widget to `path`, resolved against the base URI.
    pub fn navigate(&self, path: &str) -> Result<(), WebViewError> {
        self.check_disposed()?;
        let absolute = resolve_app_uri(path);
        debug!("navigating to \"{absolute}\"");
        self.widget.load_uri(&absolute)
    }

    /// Send a text message into the hosted page.
    ///
    /// The message is embedded as an escaped JavaScript string literal, so
    /// arbitrary content (quotes, backslashes, newlines) is safe.
    pub fn send_message(&self, message: &str) -> Result<(), WebViewError> {
        self.check_disposed()?;
        let script = ipc::dispatch_script(message);
        debug!("dispatching `{script}`");
        self.widget.evaluate_script(&script)
    }

    /// Deliver a message received from the hosted script context to the
    /// engine. Best-effort; the engine contract has no error channel here.
    pub fn message_received(&self, message: &str) {
        if self.disposed {
            return;
        }
        debug!("message received: {message}");
        self.engine.dispatch_host_message(BASE_URI, message);
    }

    /// Ask the engine to mount a root component.
    pub fn add_root_component(&self, component: &RootComponent) -> Result<(), EngineError> {
        self.engine.add_root_component(component)
    }

    /// Ask the engine to unmount the component at `selector`. The engine
    /// owns idempotency for unknown selectors.
    pub fn remove_root_component(&self, selector: &str) -> Result<(), EngineError> {
        self.engine.remove_root_component(selector)
    }

    /// Resize the widget.
    pub fn set_bounds(&self, width: u32, height: u32) -> Result<(), WebViewError> {
        self.check_disposed()?;
        self.widget.set_bounds(width, height)
    }

    /// Release the widget. Further calls fail with
    /// [`WebViewError::Disposed`].
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn check_disposed(&self) -> Result<(), WebViewError> {
        if self.disposed {
            Err(WebViewError::Disposed)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentType;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingWidget {
        loads: Mutex<Vec<String>>,
        scripts: Mutex<Vec<String>>,
    }

    impl WebViewWidget for Arc<RecordingWidget> {
        fn load_uri(&self, uri: &str) -> Result<(), WebViewError> {
            self.loads.lock().unwrap().push(uri.to_string());
            Ok(())
        }

        fn evaluate_script(&self, script: &str) -> Result<(), WebViewError> {
            self.scripts.lock().unwrap().push(script.to_string());
            Ok(())
        }

        fn set_bounds(&self, _width: u32, _height: u32) -> Result<(), WebViewError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingEngine {
        added: Mutex<Vec<String>>,
        removed: Mutex<Vec<String>>,
        messages: Mutex<Vec<(String, String)>>,
    }

    impl ComponentEngine for RecordingEngine {
        fn add_root_component(&self, component: &RootComponent) -> Result<(), EngineError> {
            self.added.lock().unwrap().push(component.selector().to_string());
            Ok(())
        }

        fn remove_root_component(&self, selector: &str) -> Result<(), EngineError> {
            self.removed.lock().unwrap().push(selector.to_string());
            Ok(())
        }

        fn dispatch_host_message(&self, base_uri: &str, message: &str) {
            self.messages
                .lock()
                .unwrap()
                .push((base_uri.to_string(), message.to_string()));
        }
    }

    fn manager_with_mocks() -> (WebViewManager, Arc<RecordingWidget>, Arc<RecordingEngine>) {
        let widget = Arc::new(RecordingWidget::default());
        let engine = Arc::new(RecordingEngine::default());
        let manager = WebViewManager::new(Box::new(Arc::clone(&widget)), engine.clone());
        (manager, widget, engine)
    }

    // -----------------------------------------------------------------
    // URI resolution
    // -----------------------------------------------------------------

    #[test]
    fn root_path_resolves_to_base_uri() {
        assert_eq!(resolve_app_uri("/"), "app://localhost/");
    }

    #[test]
    fn relative_paths_are_joined() {
        assert_eq!(resolve_app_uri("/counter"), "app://localhost/counter");
        assert_eq!(resolve_app_uri("counter"), "app://localhost/counter");
    }

    #[test]
    fn absolute_uris_pass_through() {
        assert_eq!(
            resolve_app_uri("app://localhost/deep/link"),
            "app://localhost/deep/link"
        );
    }

    // -----------------------------------------------------------------
    // Navigation and messaging
    // -----------------------------------------------------------------

    #[test]
    fn navigate_loads_resolved_uri() {
        let (manager, widget, _) = manager_with_mocks();
        manager.navigate("/").unwrap();
        assert_eq!(widget.loads.lock().unwrap().as_slice(), ["app://localhost/"]);
    }

    #[test]
    fn send_message_evaluates_escaped_dispatch() {
        let (manager, widget, _) = manager_with_mocks();
        manager.send_message("say \"hi\"\n").unwrap();

        let scripts = widget.scripts.lock().unwrap();
        assert_eq!(
            scripts.as_slice(),
            ["__dispatchMessageCallback(\"say \\\"hi\\\"\\n\")"]
        );
    }

    #[test]
    fn message_received_reaches_engine_with_base_uri() {
        let (manager, _, engine) = manager_with_mocks();
        manager.message_received("hello host");

        let messages = engine.messages.lock().unwrap();
        assert_eq!(
            messages.as_slice(),
            [("app://localhost/".to_string(), "hello host".to_string())]
        );
    }

    #[test]
    fn component_calls_forward_to_engine() {
        let (manager, _, engine) = manager_with_mocks();
        let component =
            RootComponent::new("#app", ComponentType::new("counter"), None).unwrap();

        manager.add_root_component(&component).unwrap();
        manager.remove_root_component("#app").unwrap();
        // Removal of a selector that was never added still forwards.
        manager.remove_root_component("#ghost").unwrap();

        assert_eq!(engine.added.lock().unwrap().as_slice(), ["#app"]);
        assert_eq!(engine.removed.lock().unwrap().as_slice(), ["#app", "#ghost"]);
    }

    // -----------------------------------------------------------------
    // Disposal
    // -----------------------------------------------------------------

    #[test]
    fn disposed_manager_rejects_calls() {
        let (mut manager, _, engine) = manager_with_mocks();
        manager.dispose();

        assert!(matches!(manager.navigate("/"), Err(WebViewError::Disposed)));
        assert!(matches!(
            manager.send_message("x"),
            Err(WebViewError::Disposed)
        ));
        assert!(matches!(
            manager.set_bounds(10, 10),
            Err(WebViewError::Disposed)
        ));

        // In-flight message delivery after dispose is dropped, not an error.
        manager.message_received("late");
        assert!(engine.messages.lock().unwrap().is_empty());
    }
}
