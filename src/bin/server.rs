//! Trade Ledger Server
//!
//! Records securities trades over HTTP and serves the running
//! volume-weighted average price per ticker.
//!
//! # Usage
//! ```sh
//! DATABASE_URL=sqlite://data/ledger.db SERVER_PORT=8080 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `DATABASE_URL` - SQLite URL, or `memory` for a throwaway store (default: sqlite://tradeledger.db)
//! - `SERVER_BIND_ADDRESS` / `SERVER_PORT` - Listen address (default: 127.0.0.1:8080)
//! - `REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `TRADE_MAX_RETRIES` - Retries on write conflicts (default: 5)
//! - `TRADE_OPERATION_TIMEOUT_MS` - Deadline for recording one trade (default: 10000)
//! - `RUST_LOG` - Log filter (default: info)

use anyhow::Result;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;
use tradeledger::application::system::Application;
use tradeledger::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Trade Ledger Server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Database={}, Address={}, MaxRetries={}",
        config.persistence.database_url,
        config.server.address(),
        config.retry.max_retries
    );

    let app = Application::build(config).await?;

    app.serve(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received. Draining connections...");
    })
    .await
}
