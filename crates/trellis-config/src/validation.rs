//! Configuration validation.

use crate::schema::TrellisConfig;
use trellis_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TrellisConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range(&mut errors, "window.width", config.window.width, 200, 8192);
    validate_range(&mut errors, "window.height", config.window.height, 200, 8192);

    if config.window.title.trim().is_empty() {
        errors.push("window.title must not be empty".into());
    }

    if config.webview.host_page.trim().is_empty() {
        errors.push("webview.host_page must not be empty".into());
    }

    if !config.webview.start_path.starts_with('/') {
        errors.push(format!(
            "webview.start_path = \"{}\" must begin with '/'",
            config.webview.start_path
        ));
    }

    if config.logging.level.trim().is_empty() {
        errors.push("logging.level must not be empty".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}
