use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::PersistenceEnvConfig;
use crate::domain::repositories::StockRepository;
use crate::infrastructure::persistence::{Database, SqliteStockRepository};
use crate::infrastructure::repositories::InMemoryStockRepository;

pub struct PersistenceHandle {
    /// `None` when running on the in-memory store
    pub db: Option<Database>,
    pub stock_repository: Arc<dyn StockRepository>,
}

pub struct PersistenceBootstrap;

impl PersistenceBootstrap {
    pub async fn init(config: &PersistenceEnvConfig) -> Result<PersistenceHandle> {
        if config.uses_in_memory_store() {
            warn!("Using in-memory store: trades will not survive a restart");
            return Ok(PersistenceHandle {
                db: None,
                stock_repository: Arc::new(InMemoryStockRepository::new()),
            });
        }

        info!("Initializing Database at {}", config.database_url);
        let db = Database::connect(config)
            .await
            .context("Failed to initialize database")?;

        let stock_repository = Arc::new(SqliteStockRepository::new(db.pool.clone()));

        Ok(PersistenceHandle {
            db: Some(db),
            stock_repository,
        })
    }
}
