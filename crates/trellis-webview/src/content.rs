//! Static asset serving for the custom URI scheme.
//!
//! The host page and its static assets live in the content root directory
//! (the directory containing the host page, conventionally `wwwroot`).
//! [`StaticAssets`] resolves intercepted `app://` URIs against that
//! directory, with optional in-memory overrides for generated content.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::engine::{AssetResolver, ResolveError, ResponseContent};

/// Source of static file content.
///
/// `Physical` serves from a directory on disk; `Null` serves nothing.
/// After publishing, assets sit next to the executable and `Physical` is
/// used; when the content root is absent, the provider is `Null` and every
/// lookup misses.
#[derive(Debug, Clone)]
pub enum FileProvider {
    Physical(PathBuf),
    Null,
}

impl FileProvider {
    /// Choose a provider for `content_root`: `Physical` when the directory
    /// exists on disk, `Null` otherwise.
    pub fn for_dir(content_root: &Path) -> Self {
        if content_root.is_dir() {
            Self::Physical(content_root.to_path_buf())
        } else {
            Self::Null
        }
    }

    /// Read a file by content-root-relative path.
    ///
    /// Returns `None` on a miss, on traversal outside the content root, or
    /// for the `Null` provider.
    pub fn read(&self, relative: &str) -> Option<Vec<u8>> {
        let base = match self {
            Self::Physical(base) => base,
            Self::Null => return None,
        };

        let clean = relative.trim_start_matches('/');
        let file_path = base.join(clean);

        // Prevent directory traversal (including symlink bypass).
        // Canonicalize both paths to resolve symlinks, `..`, etc.
        let canonical_base = std::fs::canonicalize(base).ok()?;
        let canonical_file = std::fs::canonicalize(&file_path).ok()?;
        if !canonical_file.starts_with(&canonical_base) {
            return None;
        }

        std::fs::read(&canonical_file).ok()
    }
}

/// Serves content-root assets in response to intercepted requests.
pub struct StaticAssets {
    provider: FileProvider,
    /// In-memory overrides (for dynamically generated content).
    overrides: HashMap<String, (String, Vec<u8>)>, // path -> (mime, data)
}

impl StaticAssets {
    pub fn new(provider: FileProvider) -> Self {
        Self {
            provider,
            overrides: HashMap::new(),
        }
    }

    /// Register an in-memory asset override.
    pub fn add_override(
        &mut self,
        path: impl Into<String>,
        mime: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) {
        self.overrides
            .insert(path.into(), (mime.into(), data.into()));
    }
}

impl AssetResolver for StaticAssets {
    fn resolve(&self, uri: &str, _is_navigation: bool) -> Result<ResponseContent, ResolveError> {
        let path = uri_path(uri)?;

        if let Some((mime, data)) = self.overrides.get(path.as_str()) {
            return Ok(ResponseContent::ok(data.clone(), mime.clone()));
        }

        match self.provider.read(&path) {
            Some(data) => {
                let mime = mime_from_extension(Path::new(path.as_str()));
                Ok(ResponseContent::ok(data, mime))
            }
            None => Err(ResolveError::not_found()),
        }
    }
}

/// Extract the content-root-relative path from an absolute URI, trimming
/// query string and fragment.
fn uri_path(uri: &str) -> Result<String, ResolveError> {
    let after_scheme = uri.split_once("://").map(|(_, rest)| rest).ok_or_else(|| ResolveError {
        status: 400,
        message: format!("malformed uri \"{uri}\""),
    })?;

    let path = match after_scheme.split_once('/') {
        Some((_authority, path)) => path,
        None => "",
    };

    let path = path.split(['?', '#']).next().unwrap_or("");
    Ok(path.to_string())
}

/// Guess MIME type from file extension.
pub fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",
        Some("txt") => "text/plain",
        Some("xml") => "application/xml",
        _ => "application/octet-stream",
    }
}
