use crate::config::PersistenceEnvConfig;
use crate::domain::errors::StoreError;
use anyhow::{Context, Result};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::info;

// SQLite primary result codes
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Pooled SQLite connection with the ledger schema in place
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Connect with default pool settings
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::connect(&PersistenceEnvConfig {
            database_url: db_url.to_string(),
            ..PersistenceEnvConfig::default()
        })
        .await
    }

    pub async fn connect(config: &PersistenceEnvConfig) -> Result<Self> {
        let db_url = config.database_url.as_str();

        // Ensure the directory exists if it's a file path
        if let Some(path_part) = db_url.strip_prefix("sqlite://") {
            let path = Path::new(path_part);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let options = SqliteConnectOptions::from_str(db_url)
            .with_context(|| format!("Invalid database URL: {}", db_url))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout)
            .journal_mode(SqliteJournalMode::Wal); // Readers don't block the writer

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        info!("Connected to database: {}", db_url);

        let db = Self { pool };
        db.init().await?;

        Ok(db)
    }

    /// Initialize database schema
    async fn init(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        // 1. Stocks: one aggregate row per ticker
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stocks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker_symbol TEXT NOT NULL UNIQUE CHECK (length(ticker_symbol) <= 10),
                average_price TEXT NOT NULL,
                total_volume TEXT NOT NULL,
                total_value TEXT NOT NULL,
                version INTEGER NOT NULL DEFAULT 0,
                last_updated TEXT NOT NULL
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create stocks table")?;

        // 2. Trades: append-only, owned by a stock
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trades (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                stock_id INTEGER NOT NULL
                    CONSTRAINT fk_trades_stocks REFERENCES stocks (id) ON DELETE RESTRICT,
                price TEXT NOT NULL,
                quantity TEXT NOT NULL,
                broker_id TEXT NOT NULL CHECK (length(broker_id) <= 50),
                traded_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create trades table")?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_trades_stock_id
            ON trades (stock_id);
            "#,
        )
        .execute(&mut *conn)
        .await
        .context("Failed to create trades index")?;

        info!("Database schema initialized.");
        Ok(())
    }
}

/// Lock contention and pool exhaustion clear up on their own; everything
/// else (I/O, constraint violations, protocol errors) does not.
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Database(db_err) => db_err
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            // Extended codes carry the primary code in the low byte
            .map(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
            .unwrap_or(false),
        _ => false,
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if is_transient(&err) {
            StoreError::Busy(Box::new(err))
        } else {
            StoreError::Backend(Box::new(err))
        }
    }
}
