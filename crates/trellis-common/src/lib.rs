pub mod errors;

pub use errors::{ConfigError, TrellisError, WebViewError};

pub type Result<T> = std::result::Result<T, TrellisError>;
