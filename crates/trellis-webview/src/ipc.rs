//! The script message channel between the hosted page and the host process.
//!
//! Messages flow in both directions:
//! - **Page -> host**: the bootstrap script forwards `external.sendMessage`
//!   calls into the widget's IPC channel; the host receives the raw text
//!   and hands it to the engine contract.
//! - **Host -> page**: the host evaluates a `__dispatchMessageCallback`
//!   call carrying the message as an escaped JavaScript string literal.

use std::collections::HashSet;
use std::fmt::Write;

use trellis_common::WebViewError;

/// Name of the script-to-host message channel.
pub const CHANNEL: &str = "webview";

/// Bootstrap installed at document start into every frame, before any page
/// script runs. Installs the callback registry and the `window.external`
/// bridge that forwards outbound page messages into the IPC channel.
pub const BOOTSTRAP_SCRIPT: &str = r#"
(function () {
    window.__receiveMessageCallbacks = [];

    window.__dispatchMessageCallback = function (message) {
        window.__receiveMessageCallbacks.forEach(function (callback) { callback(message); });
    };

    window.external = {
        sendMessage: function (message) {
            window.ipc.postMessage(message);
        },
        receiveMessage: function (callback) {
            window.__receiveMessageCallbacks.push(callback);
        }
    };
})();
"#;

/// Escape text for embedding in a double-quoted JavaScript string literal.
///
/// Follows JavaScript string-literal escaping rules exactly: quotes,
/// backslashes and C0 controls would otherwise terminate or corrupt the
/// injected script. `<`, `>` and `&` are escaped so the literal stays inert
/// inside script-in-markup contexts, and U+2028/U+2029 because they are
/// line terminators in JavaScript source.
pub fn js_string_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\u0027"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '<' => out.push_str("\\u003C"),
            '>' => out.push_str("\\u003E"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Generate the script that delivers a host message to the page's
/// callback registry.
pub fn dispatch_script(message: &str) -> String {
    format!("__dispatchMessageCallback(\"{}\")", js_string_escape(message))
}

/// Tracks script-message channel registrations for one host view.
///
/// Registration is one-time and non-idempotent: a second registration of
/// the same name is a setup error and fails fast instead of silently
/// rebinding the channel.
#[derive(Default)]
pub struct ChannelRegistry {
    registered: HashSet<String>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`. Fails with
    /// [`WebViewError::ChannelAlreadyRegistered`] when it was registered
    /// before.
    pub fn register(&mut self, name: &str) -> Result<(), WebViewError> {
        if !self.registered.insert(name.to_string()) {
            return Err(WebViewError::ChannelAlreadyRegistered(name.to_string()));
        }
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registered.contains(name)
    }
}
