//! The host widget adapter.
//!
//! [`HostView`] owns the lifecycle of one embedded webview: it walks the
//! `Uninitialized -> Initialized -> Disposed` state machine, wires the
//! interception bridge and message channel onto the native widget, keeps
//! the live page in sync with the declared root components, and tears
//! everything down in two phases on dispose.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info};
use trellis_common::WebViewError;
use wry::raw_window_handle;

use crate::bridge::{SchemeBridge, SCHEME};
use crate::components::RootComponentsCollection;
use crate::content::{FileProvider, StaticAssets};
use crate::dispatcher::{Dispatcher, WebViewCommand};
use crate::engine::{AssetResolver, ComponentEngine};
use crate::ipc::{self, ChannelRegistry, BOOTSTRAP_SCRIPT};
use crate::manager::{WebViewManager, WebViewWidget};

/// Startup options for a [`HostView`].
#[derive(Debug, Clone)]
pub struct HostOptions {
    /// Host page path relative to the application root directory.
    pub host_page: String,
    /// Path navigated to once initialization completes.
    pub start_path: String,
    /// Whether the webview developer tools are enabled.
    pub devtools: bool,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            host_page: "wwwroot/index.html".into(),
            start_path: "/".into(),
            devtools: false,
        }
    }
}

/// Lifecycle state of a [`HostView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Uninitialized,
    Initialized,
    Disposed,
}

/// Hosts a component-rendering engine inside an embedded webview.
pub struct HostView {
    state: HostState,
    options: HostOptions,
    engine: Arc<dyn ComponentEngine>,
    dispatcher: Arc<Dispatcher>,
    channels: ChannelRegistry,
    root_components: RootComponentsCollection,
    manager: Option<WebViewManager>,
}

impl HostView {
    /// Create an uninitialized host view. Root components declared before
    /// initialization are mounted during the replay that initialization
    /// performs, so they are present in the very first paint.
    pub fn new(engine: Arc<dyn ComponentEngine>, options: HostOptions) -> Self {
        Self {
            state: HostState::Uninitialized,
            options,
            engine,
            dispatcher: Arc::new(Dispatcher::new()),
            channels: ChannelRegistry::new(),
            root_components: RootComponentsCollection::new(),
            manager: None,
        }
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn is_disposed(&self) -> bool {
        self.state == HostState::Disposed
    }

    /// The declared root components.
    pub fn root_components(&self) -> &RootComponentsCollection {
        &self.root_components
    }

    /// Mutable access to the root component declarations. Fails after
    /// dispose.
    pub fn root_components_mut(
        &mut self,
    ) -> Result<&mut RootComponentsCollection, WebViewError> {
        self.check_disposed()?;
        Ok(&mut self.root_components)
    }

    /// Build the native wry webview as a child of `window` and initialize
    /// against it.
    ///
    /// Registers the custom scheme, the message channel, and the bootstrap
    /// script exactly once for the lifetime of this view. Re-attaching
    /// while initialized is a no-op; attaching after dispose fails.
    pub fn attach<W: raw_window_handle::HasWindowHandle>(
        &mut self,
        window: &W,
        width: u32,
        height: u32,
    ) -> Result<(), WebViewError> {
        self.check_disposed()?;
        if self.state == HostState::Initialized {
            return Ok(());
        }

        let app_root = app_root_dir(&self.options.host_page);
        let (content_root, relative_host_path) = content_paths(&app_root, &self.options.host_page);
        debug!(
            "serving content root {} (host page \"{relative_host_path}\")",
            content_root.display()
        );

        let resolver: Arc<dyn AssetResolver> =
            Arc::new(StaticAssets::new(FileProvider::for_dir(&content_root)));
        let bridge = Arc::new(SchemeBridge::new(resolver, relative_host_path.clone()));

        let ipc_dispatcher = Arc::clone(&self.dispatcher);
        let webview = wry::WebViewBuilder::new()
            .with_bounds(child_bounds(width, height))
            .with_devtools(self.options.devtools)
            .with_initialization_script(BOOTSTRAP_SCRIPT)
            .with_custom_protocol(SCHEME.to_string(), move |_wv_id, request| {
                bridge.serve(request)
            })
            .with_ipc_handler(move |request| {
                let body = request.body().to_string();
                ipc_dispatcher.submit(WebViewCommand::HostMessage(body));
            })
            .build_as_child(window)
            .map_err(|e| WebViewError::MissingContext(format!("webview build failed: {e}")))?;

        self.initialize(Box::new(WryWidget { webview }))
    }

    /// Initialize against an already-built widget surface.
    ///
    /// This is the backend-agnostic half of [`attach`](Self::attach):
    /// registers the message channel, installs the collection observer,
    /// replays the declared root components synchronously in insertion
    /// order, and navigates to the start path. Idempotent while
    /// initialized; fails after dispose.
    pub fn initialize(&mut self, widget: Box<dyn WebViewWidget>) -> Result<(), WebViewError> {
        self.check_disposed()?;
        if self.state == HostState::Initialized {
            return Ok(());
        }
        // Without a host page there is nothing to serve; stay uninitialized
        // until the startup properties are complete.
        if self.options.host_page.trim().is_empty() {
            return Ok(());
        }

        self.channels.register(ipc::CHANNEL)?;

        let manager = WebViewManager::new(widget, Arc::clone(&self.engine));

        let observer_dispatcher = Arc::clone(&self.dispatcher);
        self.root_components.set_observer(Box::new(move |added, removed| {
            for component in added {
                observer_dispatcher.submit(WebViewCommand::AddRootComponent(component.clone()));
            }
            for component in removed {
                observer_dispatcher.submit(WebViewCommand::RemoveRootComponent(
                    component.selector().to_string(),
                ));
            }
        }));

        // The page is not loaded yet, so these complete synchronously and
        // the components are present in the first paint.
        for component in self.root_components.iter() {
            if let Err(e) = manager.add_root_component(component) {
                error!("failed to add root component {}: {e}", component.selector());
            }
        }

        manager.navigate(&self.options.start_path)?;
        info!(
            "host view initialized (host page \"{}\", start path \"{}\")",
            self.options.host_page, self.options.start_path
        );

        self.manager = Some(manager);
        self.state = HostState::Initialized;
        Ok(())
    }

    /// Drain the dispatcher and apply every pending command on the owning
    /// thread. Returns the number of commands processed. Call once per
    /// event-loop turn. Engine failures are logged, never propagated to
    /// the caller that mutated the collection.
    pub fn pump(&mut self) -> usize {
        if self.state != HostState::Initialized {
            return 0;
        }
        let manager = match self.manager.as_ref() {
            Some(m) => m,
            None => return 0,
        };

        let commands = self.dispatcher.drain();
        let count = commands.len();
        for command in commands {
            match command {
                WebViewCommand::AddRootComponent(component) => {
                    if let Err(e) = manager.add_root_component(&component) {
                        error!("failed to add root component {}: {e}", component.selector());
                    }
                }
                WebViewCommand::RemoveRootComponent(selector) => {
                    if let Err(e) = manager.remove_root_component(&selector) {
                        error!("failed to remove root component {selector}: {e}");
                    }
                }
                WebViewCommand::HostMessage(message) => {
                    manager.message_received(&message);
                }
            }
        }
        count
    }

    /// Send a text message into the hosted page.
    pub fn send_message(&self, message: &str) -> Result<(), WebViewError> {
        self.check_disposed()?;
        self.require_manager()?.send_message(message)
    }

    /// Navigate the hosted page to `path` (resolved against the app base
    /// URI).
    pub fn navigate(&self, path: &str) -> Result<(), WebViewError> {
        self.check_disposed()?;
        self.require_manager()?.navigate(path)
    }

    /// Resize the embedded widget within its parent window.
    pub fn set_bounds(&self, width: u32, height: u32) -> Result<(), WebViewError> {
        self.check_disposed()?;
        self.require_manager()?.set_bounds(width, height)
    }

    /// Two-phase shutdown: quiesce first (the disposed flag is set and the
    /// dispatcher stops accepting work, so in-flight collection handling
    /// observes the disposed state), then release the widget and manager.
    /// A second call is a no-op beyond the flag.
    pub fn dispose(&mut self) {
        if self.state == HostState::Disposed {
            return;
        }
        self.state = HostState::Disposed;
        self.dispatcher.quiesce();

        if let Some(mut manager) = self.manager.take() {
            manager.dispose();
        }
        info!("host view disposed");
    }

    fn check_disposed(&self) -> Result<(), WebViewError> {
        if self.state == HostState::Disposed {
            Err(WebViewError::Disposed)
        } else {
            Ok(())
        }
    }

    fn require_manager(&self) -> Result<&WebViewManager, WebViewError> {
        self.manager
            .as_ref()
            .ok_or_else(|| WebViewError::MissingContext("webview not initialized".into()))
    }
}

impl Drop for HostView {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Application root directory: the executable's directory when the host
/// page exists next to it (the published layout), otherwise the current
/// directory (the development layout, where assets sit in the source
/// tree).
fn app_root_dir(host_page: &str) -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(exe_dir) = exe.parent() {
            if exe_dir.join(host_page).exists() {
                return exe_dir.to_path_buf();
            }
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Split a host page path into the content root directory and the host
/// page path relative to it. The host page is always at the root of the
/// content directory.
fn content_paths(app_root: &Path, host_page: &str) -> (PathBuf, String) {
    let host_page_full = app_root.join(host_page);
    let content_root = host_page_full
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| app_root.to_path_buf());
    let relative = host_page_full
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| host_page.to_string());
    (content_root, relative)
}

/// Child-webview bounds filling the given window size.
fn child_bounds(width: u32, height: u32) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Physical(wry::dpi::PhysicalPosition::new(0, 0)),
        size: wry::dpi::Size::Physical(wry::dpi::PhysicalSize::new(width, height)),
    }
}

/// The production widget surface backed by `wry::WebView`.
struct WryWidget {
    webview: wry::WebView,
}

impl WebViewWidget for WryWidget {
    fn load_uri(&self, uri: &str) -> Result<(), WebViewError> {
        self.webview
            .load_url(uri)
            .map_err(|e| WebViewError::Widget(e.to_string()))
    }

    fn evaluate_script(&self, script: &str) -> Result<(), WebViewError> {
        self.webview
            .evaluate_script(script)
            .map_err(|e| WebViewError::Widget(e.to_string()))
    }

    fn set_bounds(&self, width: u32, height: u32) -> Result<(), WebViewError> {
        self.webview
            .set_bounds(child_bounds(width, height))
            .map_err(|e| WebViewError::Widget(e.to_string()))
    }
}
