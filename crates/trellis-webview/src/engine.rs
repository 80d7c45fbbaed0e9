//! Contracts consumed from the upstream component-rendering framework.
//!
//! Trellis does not render components itself. It binds a rendering engine
//! (the owner of the diffing and reconciliation logic) to a native webview.
//! The engine is reached through two capability traits:
//!
//! - [`AssetResolver`] maps a logical `app://` URI to byte content plus
//!   headers. The interception bridge calls it for every intercepted
//!   resource request.
//! - [`ComponentEngine`] receives root-component mounts/unmounts and
//!   messages arriving from the hosted script context.

use crate::components::RootComponent;

/// A fully-buffered response produced by asset resolution.
///
/// The body is consumed once to populate the native response; there is no
/// streaming. Host pages and their assets are small static files, so a
/// single copy is fine.
#[derive(Debug, Clone)]
pub struct ResponseContent {
    pub status: u16,
    pub status_message: String,
    pub body: Vec<u8>,
    /// Response headers, `Content-Type` included.
    pub headers: Vec<(String, String)>,
}

impl ResponseContent {
    /// Build a 200 response with a single `Content-Type` header.
    pub fn ok(body: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            status: 200,
            status_message: "OK".into(),
            body,
            headers: vec![("Content-Type".into(), content_type.into())],
        }
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The `Content-Type` header, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }
}

/// Failure outcome of asset resolution: a status code plus message,
/// surfaced to the native widget without retry or fallback.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{status} {message}")]
pub struct ResolveError {
    pub status: u16,
    pub message: String,
}

impl ResolveError {
    pub fn not_found() -> Self {
        Self {
            status: 404,
            message: "Not Found".into(),
        }
    }
}

/// Maps a logical URI to byte content and headers.
///
/// Implementations must not block unboundedly: interception calls are
/// answered synchronously while the widget waits. Local files and
/// in-memory assets only.
pub trait AssetResolver: Send + Sync {
    /// Resolve `uri` to response content. `is_navigation` distinguishes
    /// top-level document requests from subresource fetches.
    fn resolve(&self, uri: &str, is_navigation: bool) -> Result<ResponseContent, ResolveError>;
}

/// Failure reported by the engine for a component add/remove.
#[derive(Debug, Clone, thiserror::Error)]
#[error("engine error: {0}")]
pub struct EngineError(pub String);

/// The component-render contract.
///
/// Mount and unmount requests are forwarded here, as are text messages
/// arriving from the hosted script context. Message dispatch is
/// best-effort and has no error channel of its own.
pub trait ComponentEngine: Send + Sync {
    /// Mount a root component at its selector.
    fn add_root_component(&self, component: &RootComponent) -> Result<(), EngineError>;

    /// Unmount the root component at `selector`. Unmounting a selector
    /// that was never mounted must be tolerated by the engine.
    fn remove_root_component(&self, selector: &str) -> Result<(), EngineError>;

    /// Deliver a text message received from the hosted script context.
    fn dispatch_host_message(&self, base_uri: &str, message: &str);
}
