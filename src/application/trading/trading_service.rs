use crate::application::trading::retry::RetryPolicy;
use crate::domain::errors::{TradingError, ValidationError};
use crate::domain::repositories::StockRepository;
use crate::domain::trading::ticker;
use crate::domain::trading::types::{NewTrade, Stock, Trade};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Records trades and serves the per-ticker aggregates.
///
/// Holds no mutable state: every call goes to the repository, which is
/// responsible for isolating concurrent writers on the same ticker.
#[derive(Clone)]
pub struct TradingService {
    repository: Arc<dyn StockRepository>,
    retry_policy: RetryPolicy,
    operation_timeout: Duration,
}

impl TradingService {
    pub fn new(
        repository: Arc<dyn StockRepository>,
        retry_policy: RetryPolicy,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            retry_policy,
            operation_timeout,
        }
    }

    /// Append a trade and fold it into the ticker's volume-weighted average.
    ///
    /// Input is validated before the store is touched. Transient store errors
    /// replay the whole unit of work; the deadline covers every attempt.
    pub async fn record_trade(
        &self,
        ticker: &str,
        price: Decimal,
        quantity: Decimal,
        broker_id: &str,
    ) -> Result<Trade, TradingError> {
        let new_trade = NewTrade::new(ticker, price, quantity, broker_id)?;
        let ticker = new_trade.ticker.to_string();

        let repository = &self.repository;
        let pending = &new_trade;
        let attempt_all = self.retry_policy.run("record_trade", move |attempt| {
            debug!(ticker = %pending.ticker, attempt, "Recording trade");
            repository.record_trade(pending)
        });

        match tokio::time::timeout(self.operation_timeout, attempt_all).await {
            Ok(Ok(trade)) => {
                info!(
                    ticker = %trade.ticker_symbol,
                    trade_id = trade.id,
                    price = %trade.price,
                    quantity = %trade.quantity,
                    broker_id = %trade.broker_id,
                    "Trade recorded"
                );
                Ok(trade)
            }
            Ok(Err(failure)) if failure.error.is_transient() => {
                error!(
                    ticker = %ticker,
                    attempts = failure.attempts,
                    "Giving up on trade after repeated conflicts: {}",
                    failure.error
                );
                Err(TradingError::RetriesExhausted {
                    ticker,
                    attempts: failure.attempts,
                    source: failure.error,
                })
            }
            Ok(Err(failure)) => {
                error!(
                    ticker = %ticker,
                    operation = "record_trade",
                    "Failed to record trade: {:?}",
                    failure.error
                );
                Err(TradingError::Storage(failure.error))
            }
            Err(_) => {
                let timeout_ms = self.operation_timeout.as_millis() as u64;
                error!(ticker = %ticker, timeout_ms, "Recording trade timed out");
                Err(TradingError::Timeout { ticker, timeout_ms })
            }
        }
    }

    /// Case-insensitive lookup of one stock
    pub async fn get_stock(&self, ticker: &str) -> Result<Stock, TradingError> {
        let ticker = ticker::normalize(ticker);
        if ticker.is_empty() {
            return Err(ValidationError::Required {
                field: "tickerSymbol",
            }
            .into());
        }

        match self.repository.find_by_ticker(&ticker).await {
            Ok(Some(stock)) => Ok(stock),
            Ok(None) => Err(TradingError::StockNotFound { ticker }),
            Err(e) => {
                error!(ticker = %ticker, operation = "get_stock", "Failed to load stock: {:?}", e);
                Err(TradingError::Storage(e))
            }
        }
    }

    /// All stocks, or only those named in `tickers` (normalized and
    /// de-duplicated). A filter with no usable entries lists everything.
    pub async fn list_stocks<S: AsRef<str>>(&self, tickers: &[S]) -> Result<Vec<Stock>, TradingError> {
        let filter = ticker::normalize_filter(tickers);

        self.repository.list(&filter).await.map_err(|e| {
            error!(tickers = ?filter, operation = "list_stocks", "Failed to list stocks: {:?}", e);
            TradingError::Storage(e)
        })
    }

    /// Verifies the store answers
    pub async fn health_check(&self) -> Result<(), TradingError> {
        self.repository.ping().await.map_err(TradingError::Storage)
    }
}
