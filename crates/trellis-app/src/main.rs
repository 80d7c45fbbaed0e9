mod app;
mod cli;
mod engine;

use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    // Load config first so the logging section can act as the default
    let config = match args.config.as_deref() {
        Some(path) => trellis_config::toml_loader::load_from_path(std::path::Path::new(path)),
        None => trellis_config::load_config(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Config load failed, using defaults: {e}");
        trellis_config::TrellisConfig::default()
    });

    // Initialize logging
    let log_directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "trellis=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("Trellis v{} starting...", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Host page: {} (start path {})",
        config.webview.host_page,
        config.webview.start_path
    );

    // Create event loop and run
    let event_loop = EventLoop::new().expect("failed to create event loop");
    let mut app = app::TrellisApp::new(config, args.devtools);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
