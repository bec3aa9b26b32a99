pub mod retry;
pub mod trading_service;

pub use retry::{RetryFailure, RetryPolicy};
pub use trading_service::TradingService;
