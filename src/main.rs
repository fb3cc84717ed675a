//! autohidpi-host
//!
//! Native messaging host for the AutoHiDPI browser extension. Speaks
//! length-prefixed JSON over stdin/stdout and reports Wayland display
//! information gathered from `wlr-randr`.

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use autohidpi_host::{backend::WlrRandrBackend, config::Config, session};

#[derive(Parser, Debug)]
#[command(name = "autohidpi-host")]
#[command(about = "Native messaging host reporting Wayland display information")]
struct Args {
    /// Display enumeration executable to invoke
    #[arg(long)]
    command: Option<String>,

    /// Hard timeout for the enumeration command, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Extension origin and window handle the browser appends; unused
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    browser_args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (stderr so stdout stays free for the messaging protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_env();
    if let Some(command) = args.command {
        config.command = command;
    }
    if let Some(ms) = args.timeout_ms {
        config.timeout = std::time::Duration::from_millis(ms);
    }

    if !args.browser_args.is_empty() {
        debug!(origin = ?args.browser_args, "Launched by browser");
    }

    info!(
        command = %config.command,
        timeout = ?config.timeout,
        "Starting native messaging host"
    );

    let backend = WlrRandrBackend::new(&config);
    session::serve_stdio(&backend).await
}
