//! `ApplicationHandler` implementation for the winit event loop.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

use trellis_config::TrellisConfig;
use trellis_webview::{ComponentType, HostOptions, HostView, RootComponent};

use crate::engine::DemoEngine;

/// How often the dispatcher is pumped while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(33);

pub struct TrellisApp {
    config: TrellisConfig,
    devtools: bool,
    engine: Arc<DemoEngine>,
    window: Option<Window>,
    host: Option<HostView>,
}

impl TrellisApp {
    pub fn new(config: TrellisConfig, devtools: bool) -> Self {
        Self {
            config,
            devtools,
            engine: Arc::new(DemoEngine::new()),
            window: None,
            host: None,
        }
    }

    /// Create the window and attach the host view to it.
    fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => w,
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };

        let options = HostOptions {
            host_page: self.config.webview.host_page.clone(),
            start_path: self.config.webview.start_path.clone(),
            devtools: self.devtools || self.config.webview.devtools,
        };
        let mut host = HostView::new(self.engine.clone(), options);

        // Declare the demo component before attaching so it is present in
        // the first paint.
        let mut parameters = HashMap::new();
        parameters.insert(
            "title".to_string(),
            serde_json::json!(self.config.window.title),
        );
        match RootComponent::new("#app", ComponentType::new("status-panel"), Some(parameters)) {
            Ok(component) => {
                if let Ok(components) = host.root_components_mut() {
                    components.add(component);
                }
            }
            Err(e) => tracing::error!("invalid root component: {e}"),
        }

        let size = window.inner_size();
        if let Err(e) = host.attach(&window, size.width, size.height) {
            tracing::error!("Failed to attach webview: {e}");
            return false;
        }

        self.window = Some(window);
        self.host = Some(host);
        true
    }

    /// Answer messages the page has sent since the last turn.
    fn drain_page_messages(&mut self) {
        let messages = self.engine.take_messages();
        if messages.is_empty() {
            return;
        }
        let host = match self.host.as_ref() {
            Some(h) => h,
            None => return,
        };

        for message in messages {
            let reply = if message == "ready" {
                // The page is ready: deliver every recorded mount.
                let mounts: Vec<serde_json::Value> = self
                    .engine
                    .mounts()
                    .iter()
                    .map(|m| {
                        serde_json::json!({
                            "kind": "mount",
                            "selector": m.selector,
                            "component": m.component_type,
                            "parameters": m.parameters,
                        })
                    })
                    .collect();
                serde_json::json!({ "kind": "init", "mounts": mounts })
            } else {
                serde_json::json!({ "kind": "echo", "text": message })
            };

            if let Err(e) = host.send_message(&reply.to_string()) {
                tracing::warn!("failed to deliver message to page: {e}");
            }
        }
    }

    fn shutdown(&mut self) {
        if let Some(ref mut host) = self.host {
            host.dispose();
        }
    }
}

impl ApplicationHandler for TrellisApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if !self.initialize_window(event_loop) {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(ref host) = self.host {
                        if let Err(e) = host.set_bounds(size.width, size.height) {
                            tracing::warn!("failed to resize webview: {e}");
                        }
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(ref mut host) = self.host {
            host.pump();
        }
        self.drain_page_messages();

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }
}
