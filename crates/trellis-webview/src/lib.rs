//! Embedded webview hosting for a component-rendering engine.
//!
//! Binds an upstream rendering engine to a native webview widget:
//! - Custom `app://` URI scheme serving the host page and static assets
//! - Bidirectional text-message channel (Rust <-> hosted page)
//! - Root component declarations kept in sync with the live page
//! - Single-owner-thread dispatch for work arriving from other threads

pub mod bridge;
pub mod components;
pub mod content;
pub mod dispatcher;
pub mod engine;
pub mod host;
pub mod ipc;
pub mod manager;

pub use bridge::{SchemeBridge, BASE_URI, SCHEME};
pub use components::{ComponentType, RootComponent, RootComponentsCollection};
pub use content::{FileProvider, StaticAssets};
pub use dispatcher::{Dispatcher, WebViewCommand};
pub use engine::{AssetResolver, ComponentEngine, EngineError, ResolveError, ResponseContent};
pub use host::{HostOptions, HostState, HostView};
pub use manager::{WebViewManager, WebViewWidget};
