//! Repository Pattern Abstractions
//!
//! `StockRepository` is the only seam between the trading service and the
//! persistent store. Implementations own all coordination between concurrent
//! callers: the service keeps no cached `Stock` state of its own.
//!
//! # Implementations
//!
//! - `SqliteStockRepository`: SQLite through `sqlx`, one transaction per
//!   recorded trade
//! - `InMemoryStockRepository`: a single async mutex around both tables

use crate::domain::errors::StoreError;
use crate::domain::trading::types::{NewTrade, Stock, Trade};
use async_trait::async_trait;

#[async_trait]
pub trait StockRepository: Send + Sync {
    /// Run one attempt of the record-trade unit of work: ensure the stock
    /// exists, insert the trade and fold it into the aggregate. Either all of
    /// it is persisted or none of it is.
    ///
    /// Transient failures (`StoreError::is_transient`) leave no trace and the
    /// call may be replayed as-is.
    async fn record_trade(&self, trade: &NewTrade) -> Result<Trade, StoreError>;

    /// Look up a stock by its already normalized ticker
    async fn find_by_ticker(&self, ticker: &str) -> Result<Option<Stock>, StoreError>;

    /// List stocks, restricted to `tickers` unless it is empty
    async fn list(&self, tickers: &[String]) -> Result<Vec<Stock>, StoreError>;

    /// Cheap round-trip used by health checks
    async fn ping(&self) -> Result<(), StoreError>;
}
