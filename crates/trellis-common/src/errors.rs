use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WebViewError {
    #[error("invalid scheme \"{0}\"")]
    InvalidScheme(String),

    #[error("failed to serve \"{uri}\": {status} {message}")]
    ResourceResolution {
        uri: String,
        status: u16,
        message: String,
    },

    #[error("script message channel \"{0}\" already registered")]
    ChannelAlreadyRegistered(String),

    #[error("webview has been disposed")]
    Disposed,

    #[error("missing native context: {0}")]
    MissingContext(String),

    #[error("root component selector must not be empty")]
    EmptySelector,

    #[error("widget error: {0}")]
    Widget(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TrellisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    WebView(#[from] WebViewError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
