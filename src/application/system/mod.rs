use anyhow::{Context, Result};
use axum::Router;
use std::future::Future;
use tracing::info;

use crate::application::bootstrap::persistence::{PersistenceBootstrap, PersistenceHandle};
use crate::application::trading::TradingService;
use crate::config::Config;
use crate::interfaces::http;

/// Fully wired application: store, trading service and HTTP router
pub struct Application {
    pub config: Config,
    // Kept so the pool lives as long as the application
    pub persistence: PersistenceHandle,
    pub trading: TradingService,
}

impl Application {
    pub async fn build(config: Config) -> Result<Self> {
        info!("Building trade ledger application...");

        let persistence = PersistenceBootstrap::init(&config.persistence).await?;
        let trading = TradingService::new(
            persistence.stock_repository.clone(),
            config.retry.to_retry_policy(),
            config.retry.operation_timeout,
        );

        Ok(Self {
            config,
            persistence,
            trading,
        })
    }

    pub fn router(&self) -> Router {
        http::router(self.trading.clone(), self.config.server.request_timeout)
    }

    /// Serve HTTP until `shutdown` resolves, then drain in-flight requests
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let address = self.config.server.address();
        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind to address {}", address))?;
        info!("Listening on {}", address);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .context("Server error")?;

        if let Some(db) = &self.persistence.db {
            db.pool.close().await;
        }
        info!("Server stopped.");
        Ok(())
    }
}
