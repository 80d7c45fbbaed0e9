//! Configuration schema types for Trellis.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

// =============================================================================
// Window Config
// =============================================================================

/// Host window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Initial window width in logical pixels (valid range: 200-8192).
    pub width: u32,
    /// Initial window height in logical pixels (valid range: 200-8192).
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Trellis".into(),
            width: 800,
            height: 600,
        }
    }
}

// =============================================================================
// WebView Config
// =============================================================================

/// Embedded webview configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebViewConfig {
    /// Host page path relative to the application root directory.
    pub host_page: String,
    /// Path navigated to after initialization. Must begin with `/`.
    pub start_path: String,
    /// Whether to enable the webview developer tools.
    pub devtools: bool,
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self {
            host_page: "wwwroot/index.html".into(),
            start_path: "/".into(),
            devtools: false,
        }
    }
}

// =============================================================================
// Logging Config
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log filter directive (e.g. `trellis=info`).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "trellis=info".into(),
        }
    }
}

// =============================================================================
// Root Config
// =============================================================================

/// Top-level Trellis configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrellisConfig {
    pub window: WindowConfig,
    pub webview: WebViewConfig,
    pub logging: LoggingConfig,
}
