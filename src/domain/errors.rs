use rust_decimal::Decimal;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Malformed or missing input, rejected before the store is touched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} may only contain letters, digits, '.' and '-'")]
    InvalidCharacters { field: &'static str },

    #[error("{field} must have at most {max} decimal places")]
    TooPrecise { field: &'static str, max: u32 },

    #[error("{field} must be less than {limit}")]
    OutOfRange { field: &'static str, limit: Decimal },
}

/// Failures raised by a `StockRepository` implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Concurrent update detected on stock {stock_id}")]
    Conflict { stock_id: i64 },

    #[error("Store busy: {0}")]
    Busy(#[source] BoxError),

    #[error("Corrupt value in column {column}: {value:?}")]
    Corrupt { column: &'static str, value: String },

    #[error("Aggregate overflow for {ticker}")]
    Overflow { ticker: String },

    #[error("Storage backend failure: {0}")]
    Backend(#[source] BoxError),
}

impl StoreError {
    /// Conflicts and lock contention clear up on their own; the unit of work
    /// can be replayed from scratch.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Conflict { .. } | StoreError::Busy(_))
    }
}

/// Errors surfaced by the trading service to its callers
#[derive(Debug, Error)]
pub enum TradingError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Stock not found: {ticker}")]
    StockNotFound { ticker: String },

    #[error("Gave up on {ticker} after {attempts} attempts: {source}")]
    RetriesExhausted {
        ticker: String,
        attempts: u32,
        #[source]
        source: StoreError,
    },

    #[error("Operation on {ticker} timed out after {timeout_ms}ms")]
    Timeout { ticker: String, timeout_ms: u64 },

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl TradingError {
    /// Caused by the request itself rather than by the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TradingError::Validation(_) | TradingError::StockNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_validation_error_formatting() {
        let err = ValidationError::TooLong {
            field: "tickerSymbol",
            max: 10,
        };
        assert_eq!(err.to_string(), "tickerSymbol must be at most 10 characters");

        let err = ValidationError::NotPositive { field: "price" };
        assert_eq!(err.to_string(), "price must be greater than zero");
    }

    #[test]
    fn test_store_error_transience() {
        assert!(StoreError::Conflict { stock_id: 1 }.is_transient());
        assert!(StoreError::Busy(Box::new(io::Error::other("database is locked"))).is_transient());
        assert!(!StoreError::Backend(Box::new(io::Error::other("disk I/O error"))).is_transient());
        assert!(
            !StoreError::Corrupt {
                column: "total_volume",
                value: "abc".to_string()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_trading_error_classification() {
        let validation: TradingError = ValidationError::Required { field: "brokerId" }.into();
        assert!(validation.is_client_error());

        let not_found = TradingError::StockNotFound {
            ticker: "AAPL".to_string(),
        };
        assert!(not_found.is_client_error());
        assert!(not_found.to_string().contains("AAPL"));

        let exhausted = TradingError::RetriesExhausted {
            ticker: "MSFT".to_string(),
            attempts: 6,
            source: StoreError::Conflict { stock_id: 3 },
        };
        assert!(!exhausted.is_client_error());
        assert!(exhausted.to_string().contains("6 attempts"));
    }
}
