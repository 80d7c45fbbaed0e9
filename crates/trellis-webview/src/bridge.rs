//! Resource interception bridge for the custom URI scheme.
//!
//! Every resource request the widget issues against the `app://` scheme is
//! answered here: the request URI is mapped to a resolution target (the
//! root path maps to the host page), handed to the [`AssetResolver`]
//! contract, and the buffered result is copied into the widget's native
//! response. Other schemes never reach the bridge; the widget's default
//! handling applies.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::{debug, error};
use trellis_common::WebViewError;

use crate::engine::{AssetResolver, ResponseContent};

/// The custom URI scheme answered by the bridge.
pub const SCHEME: &str = "app";

/// Base URI of the hosted application.
pub const BASE_URI: &str = "app://localhost/";

/// Map a request URI to its resolution target.
///
/// The root path always resolves to the host page: for `path == "/"` the
/// configured relative host page path is appended to the URI. Any other
/// path passes through unchanged.
pub fn resolve_target(uri: &str, path: &str, relative_host_path: &str) -> String {
    if path == "/" {
        format!("{uri}{relative_host_path}")
    } else {
        uri.to_string()
    }
}

/// Answers intercepted requests for the custom scheme.
///
/// One bridge exists per host view. The bridge holds only immutable state,
/// so it is shared into the widget's request callback as an `Arc` without
/// further locking.
pub struct SchemeBridge {
    resolver: Arc<dyn AssetResolver>,
    relative_host_path: String,
}

impl SchemeBridge {
    pub fn new(resolver: Arc<dyn AssetResolver>, relative_host_path: impl Into<String>) -> Self {
        Self {
            resolver,
            relative_host_path: relative_host_path.into(),
        }
    }

    /// Answer one intercepted request.
    ///
    /// Fails with [`WebViewError::InvalidScheme`] when the request scheme is
    /// not [`SCHEME`], and with [`WebViewError::ResourceResolution`] when
    /// the resolver cannot produce content. No retries, no fallback page.
    pub fn handle_request(&self, uri: &str, path: &str) -> Result<ResponseContent, WebViewError> {
        let scheme = uri.split(':').next().unwrap_or("");
        if scheme != SCHEME {
            return Err(WebViewError::InvalidScheme(scheme.to_string()));
        }

        let target = resolve_target(uri, path, &self.relative_host_path);
        debug!("fetching \"{target}\"");

        self.resolver
            .resolve(&target, false)
            .map_err(|e| WebViewError::ResourceResolution {
                uri: target,
                status: e.status,
                message: e.message,
            })
    }

    /// wry glue: convert an intercepted `http::Request` into the native
    /// response. Resolution failures surface to the widget as error-status
    /// responses (the widget renders its own error UI); they are also
    /// logged, since the widget swallows the details.
    pub fn serve(&self, request: wry::http::Request<Vec<u8>>) -> wry::http::Response<Cow<'static, [u8]>> {
        let uri = request.uri().to_string();
        let path = request.uri().path().to_string();

        match self.handle_request(&uri, &path) {
            Ok(content) => build_response(content),
            Err(e) => {
                error!("{e}");
                let status = match e {
                    WebViewError::ResourceResolution { status, .. } => status,
                    _ => 500,
                };
                status_response(status)
            }
        }
    }
}

fn build_response(content: ResponseContent) -> wry::http::Response<Cow<'static, [u8]>> {
    let mut builder = wry::http::Response::builder().status(content.status);
    for (name, value) in &content.headers {
        builder = builder.header(name, value);
    }
    builder
        .body(Cow::from(content.body))
        .unwrap_or_else(|_| status_response(500))
}

fn status_response(status: u16) -> wry::http::Response<Cow<'static, [u8]>> {
    wry::http::Response::builder()
        .status(status)
        .body(Cow::from(Vec::new()))
        .unwrap_or_else(|_| {
            wry::http::Response::new(Cow::from(Vec::new()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ResolveError, ResponseContent};
    use std::sync::Mutex;

    /// Resolver that records requested URIs and serves a canned response.
    struct RecordingResolver {
        requests: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingResolver {
        fn new(fail: bool) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    impl AssetResolver for RecordingResolver {
        fn resolve(&self, uri: &str, _is_navigation: bool) -> Result<ResponseContent, ResolveError> {
            self.requests.lock().unwrap().push(uri.to_string());
            if self.fail {
                Err(ResolveError::not_found())
            } else {
                Ok(ResponseContent::ok(b"<html></html>".to_vec(), "text/html"))
            }
        }
    }

    // -----------------------------------------------------------------
    // Target resolution
    // -----------------------------------------------------------------

    #[test]
    fn root_path_resolves_to_host_page() {
        let target = resolve_target("app://localhost/", "/", "index.html");
        assert_eq!(target, "app://localhost/index.html");
    }

    #[test]
    fn non_root_path_passes_through_unchanged() {
        let uri = "app://localhost/css/app.css";
        assert_eq!(resolve_target(uri, "/css/app.css", "index.html"), uri);

        let uri = "app://localhost/_framework/engine.js";
        assert_eq!(resolve_target(uri, "/_framework/engine.js", "index.html"), uri);
    }

    // -----------------------------------------------------------------
    // Request handling
    // -----------------------------------------------------------------

    #[test]
    fn wrong_scheme_fails_with_invalid_scheme() {
        let resolver = Arc::new(RecordingResolver::new(false));
        let bridge = SchemeBridge::new(resolver.clone(), "index.html");

        let err = bridge
            .handle_request("https://example.com/", "/")
            .unwrap_err();
        assert!(matches!(err, WebViewError::InvalidScheme(ref s) if s == "https"));
        // The resolver must never be consulted for a foreign scheme.
        assert!(resolver.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn root_request_is_resolved_against_host_page() {
        let resolver = Arc::new(RecordingResolver::new(false));
        let bridge = SchemeBridge::new(resolver.clone(), "index.html");

        let content = bridge.handle_request("app://localhost/", "/").unwrap();
        assert_eq!(content.status, 200);
        assert_eq!(content.content_type(), Some("text/html"));

        let requests = resolver.requests.lock().unwrap();
        assert_eq!(requests.as_slice(), ["app://localhost/index.html"]);
    }

    #[test]
    fn subresource_request_is_resolved_verbatim() {
        let resolver = Arc::new(RecordingResolver::new(false));
        let bridge = SchemeBridge::new(resolver.clone(), "index.html");

        bridge
            .handle_request("app://localhost/app.js", "/app.js")
            .unwrap();

        let requests = resolver.requests.lock().unwrap();
        assert_eq!(requests.as_slice(), ["app://localhost/app.js"]);
    }

    #[test]
    fn resolution_failure_carries_status_and_message() {
        let resolver = Arc::new(RecordingResolver::new(true));
        let bridge = SchemeBridge::new(resolver, "index.html");

        let err = bridge
            .handle_request("app://localhost/missing.js", "/missing.js")
            .unwrap_err();
        match err {
            WebViewError::ResourceResolution { uri, status, message } => {
                assert_eq!(uri, "app://localhost/missing.js");
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // -----------------------------------------------------------------
    // wry response glue
    // -----------------------------------------------------------------

    #[test]
    fn serve_copies_body_and_content_type() {
        let resolver = Arc::new(RecordingResolver::new(false));
        let bridge = SchemeBridge::new(resolver, "index.html");

        let request = wry::http::Request::builder()
            .uri("app://localhost/")
            .body(Vec::new())
            .unwrap();
        let response = bridge.serve(request);

        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "text/html"
        );
        assert_eq!(response.body().as_ref(), b"<html></html>");
    }

    #[test]
    fn serve_maps_resolution_failure_to_error_status() {
        let resolver = Arc::new(RecordingResolver::new(true));
        let bridge = SchemeBridge::new(resolver, "index.html");

        let request = wry::http::Request::builder()
            .uri("app://localhost/missing.js")
            .body(Vec::new())
            .unwrap();
        let response = bridge.serve(request);

        assert_eq!(response.status(), 404);
        assert!(response.body().is_empty());
    }
}
