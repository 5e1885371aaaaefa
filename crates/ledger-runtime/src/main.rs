//! # Election Ledger
//!
//! Reads JSON-lines requests from stdin and writes one JSON response per
//! line to stdout. Logs go to stderr.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize telemetry
//! 3. Wire the ledger container
//! 4. Serve until stdin closes

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::info;

use ledger_runtime::{serve, Gateway, LedgerContainer, RuntimeConfig};
use ledger_telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let _telemetry =
        init_telemetry(config.telemetry.clone()).context("Failed to initialize telemetry")?;

    info!("===========================================");
    info!("  Election Ledger v{}", env!("CARGO_PKG_VERSION"));
    info!("  Channel: {}", config.channel_name);
    info!("===========================================");

    let gateway = Gateway::new(Arc::new(LedgerContainer::new(config)));

    let handled = serve(
        &gateway,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
    .context("I/O error while serving requests")?;

    info!(handled, "Input closed, shutting down");
    Ok(())
}
