use crate::domain::errors::StoreError;
use crate::domain::repositories::StockRepository;
use crate::domain::trading::types::{NewTrade, Stock, Trade};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::str::FromStr;
use tracing::debug;

const STOCK_COLUMNS: &str =
    "id, ticker_symbol, average_price, total_volume, total_value, version, last_updated";

pub struct SqliteStockRepository {
    pool: SqlitePool,
}

impl SqliteStockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StockRepository for SqliteStockRepository {
    async fn record_trade(&self, trade: &NewTrade) -> Result<Trade, StoreError> {
        // Dropping `tx` on any early return rolls everything back
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();
        let ticker = trade.ticker.as_str();

        // Phase 1: ensure the stock exists. As the first statement of the
        // transaction this write also takes SQLite's write lock, so no other
        // writer can read the aggregate until we commit.
        sqlx::query(
            r#"
            INSERT INTO stocks (ticker_symbol, average_price, total_volume, total_value, version, last_updated)
            VALUES ($1, '0', '0', '0', 0, $2)
            ON CONFLICT(ticker_symbol) DO NOTHING
            "#,
        )
        .bind(ticker)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(&format!(
            "SELECT {} FROM stocks WHERE ticker_symbol = $1",
            STOCK_COLUMNS
        ))
        .bind(ticker)
        .fetch_one(&mut *tx)
        .await?;
        let stock = map_stock(&row)?;

        // Phase 2: append the trade and fold it into the aggregate
        let updated = stock
            .apply_trade(trade.price, trade.quantity, now)
            .ok_or_else(|| StoreError::Overflow {
                ticker: ticker.to_string(),
            })?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO trades (stock_id, price, quantity, broker_id, traded_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(stock.id)
        .bind(trade.price.to_string())
        .bind(trade.quantity.to_string())
        .bind(&trade.broker_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        // Optimistic row-version check: 0 rows means someone else got in first
        let result = sqlx::query(
            r#"
            UPDATE stocks SET
                average_price = $1,
                total_volume = $2,
                total_value = $3,
                version = $4,
                last_updated = $5
            WHERE id = $6 AND version = $7
            "#,
        )
        .bind(updated.average_price.to_string())
        .bind(updated.total_volume.to_string())
        .bind(updated.total_value.to_string())
        .bind(updated.version)
        .bind(now)
        .bind(stock.id)
        .bind(stock.version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict { stock_id: stock.id });
        }

        tx.commit().await?;

        let trade_id = inserted.last_insert_rowid();
        debug!(ticker, trade_id, version = updated.version, "Persisted trade");

        Ok(Trade {
            id: trade_id,
            stock_id: stock.id,
            ticker_symbol: stock.ticker_symbol,
            price: trade.price,
            quantity: trade.quantity,
            broker_id: trade.broker_id.clone(),
            traded_at: now,
        })
    }

    async fn find_by_ticker(&self, ticker: &str) -> Result<Option<Stock>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM stocks WHERE ticker_symbol = $1",
            STOCK_COLUMNS
        ))
        .bind(ticker)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_stock).transpose()
    }

    async fn list(&self, tickers: &[String]) -> Result<Vec<Stock>, StoreError> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM stocks", STOCK_COLUMNS));

        if !tickers.is_empty() {
            query.push(" WHERE ticker_symbol IN (");
            let mut separated = query.separated(", ");
            for ticker in tickers {
                separated.push_bind(ticker.clone());
            }
            separated.push_unseparated(")");
        }
        query.push(" ORDER BY id");

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(map_stock).collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn decimal_column(row: &SqliteRow, column: &'static str) -> Result<Decimal, StoreError> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw).map_err(|_| StoreError::Corrupt { column, value: raw })
}

fn map_stock(row: &SqliteRow) -> Result<Stock, StoreError> {
    Ok(Stock {
        id: row.try_get("id")?,
        ticker_symbol: row.try_get("ticker_symbol")?,
        average_price: decimal_column(row, "average_price")?,
        total_volume: decimal_column(row, "total_volume")?,
        total_value: decimal_column(row, "total_value")?,
        version: row.try_get("version")?,
        last_updated: row.try_get::<DateTime<Utc>, _>("last_updated")?,
    })
}
