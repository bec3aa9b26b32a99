//! In-Memory Repository Implementation
//!
//! Thread-safe, in-memory implementation of `StockRepository`.
//!
//! # Features
//!
//! - **Atomic**: one `tokio::sync::Mutex` guards both tables, so a recorded
//!   trade and its aggregate update are applied together or not at all
//! - **Testing**: Ideal for unit tests and development
//!
//! # Limitations
//!
//! - Data is lost on application restart
//! - No persistence across multiple instances

use crate::domain::errors::StoreError;
use crate::domain::repositories::StockRepository;
use crate::domain::trading::types::{NewTrade, Stock, Trade};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct Tables {
    stocks: Vec<Stock>,
    trades: Vec<Trade>,
}

/// In-memory implementation of StockRepository
#[derive(Clone, Default)]
pub struct InMemoryStockRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn count_trades(&self, ticker: &str) -> usize {
        let tables = self.tables.lock().await;
        tables
            .trades
            .iter()
            .filter(|t| t.ticker_symbol == ticker)
            .count()
    }
}

#[async_trait]
impl StockRepository for InMemoryStockRepository {
    async fn record_trade(&self, trade: &NewTrade) -> Result<Trade, StoreError> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let ticker = trade.ticker.as_str();

        let existing = tables.stocks.iter().position(|s| s.ticker_symbol == ticker);
        let current = match existing {
            Some(index) => tables.stocks[index].clone(),
            None => Stock {
                id: tables.stocks.len() as i64 + 1,
                ticker_symbol: ticker.to_string(),
                average_price: Decimal::ZERO,
                total_volume: Decimal::ZERO,
                total_value: Decimal::ZERO,
                version: 0,
                last_updated: now,
            },
        };

        // Nothing is written until the new aggregate is known to be valid
        let updated = current
            .apply_trade(trade.price, trade.quantity, now)
            .ok_or_else(|| StoreError::Overflow {
                ticker: ticker.to_string(),
            })?;

        let recorded = Trade {
            id: tables.trades.len() as i64 + 1,
            stock_id: updated.id,
            ticker_symbol: updated.ticker_symbol.clone(),
            price: trade.price,
            quantity: trade.quantity,
            broker_id: trade.broker_id.clone(),
            traded_at: now,
        };
        tables.trades.push(recorded.clone());
        match existing {
            Some(index) => tables.stocks[index] = updated,
            None => tables.stocks.push(updated),
        }

        Ok(recorded)
    }

    async fn find_by_ticker(&self, ticker: &str) -> Result<Option<Stock>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .stocks
            .iter()
            .find(|s| s.ticker_symbol == ticker)
            .cloned())
    }

    async fn list(&self, tickers: &[String]) -> Result<Vec<Stock>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .stocks
            .iter()
            .filter(|s| tickers.is_empty() || tickers.contains(&s.ticker_symbol))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_trade(ticker: &str, price: Decimal, quantity: Decimal) -> NewTrade {
        NewTrade::new(ticker, price, quantity, "BROKER").unwrap()
    }

    #[tokio::test]
    async fn test_first_trade_creates_stock() {
        let repo = InMemoryStockRepository::new();

        let trade = repo
            .record_trade(&new_trade("AAPL", dec!(150), dec!(3)))
            .await
            .unwrap();

        let stock = repo.find_by_ticker("AAPL").await.unwrap().unwrap();
        assert_eq!(trade.stock_id, stock.id);
        assert_eq!(stock.average_price, dec!(150));
        assert_eq!(stock.total_volume, dec!(3));
        assert_eq!(repo.list(&[]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_trades_accumulate_on_one_stock() {
        let repo = InMemoryStockRepository::new();
        repo.record_trade(&new_trade("AAPL", dec!(100), dec!(10)))
            .await
            .unwrap();
        repo.record_trade(&new_trade("AAPL", dec!(110), dec!(10)))
            .await
            .unwrap();
        repo.record_trade(&new_trade("MSFT", dec!(50), dec!(1)))
            .await
            .unwrap();

        let aapl = repo.find_by_ticker("AAPL").await.unwrap().unwrap();
        assert_eq!(aapl.average_price, dec!(105));
        assert_eq!(aapl.version, 2);
        assert_eq!(repo.count_trades("AAPL").await, 2);
        assert_eq!(repo.count_trades("MSFT").await, 1);
    }

    #[tokio::test]
    async fn test_overflow_leaves_state_untouched() {
        let repo = InMemoryStockRepository::new();
        repo.record_trade(&new_trade("BIG", dec!(99999999999999), dec!(99999999999999)))
            .await
            .unwrap();

        let mut result = Ok(());
        for _ in 0..10_000 {
            if let Err(e) = repo
                .record_trade(&new_trade("BIG", dec!(99999999999999), dec!(99999999999999)))
                .await
            {
                result = Err(e);
                break;
            }
        }

        assert!(matches!(result, Err(StoreError::Overflow { .. })));
        let trades = repo.count_trades("BIG").await;
        let stock = repo.find_by_ticker("BIG").await.unwrap().unwrap();
        assert_eq!(stock.total_volume, dec!(99999999999999) * Decimal::from(trades));
    }
}
