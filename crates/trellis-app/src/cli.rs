use clap::Parser;

/// Trellis — hosts web components inside a native desktop window.
#[derive(Parser, Debug)]
#[command(name = "trellis", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (e.g. "debug" or "trellis=debug").
    #[arg(long)]
    pub log_level: Option<String>,

    /// Enable the webview developer tools.
    #[arg(long)]
    pub devtools: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
