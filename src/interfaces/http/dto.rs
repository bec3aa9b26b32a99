//! REST API request/response types

use crate::domain::trading::types::{Stock, Trade};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /trades`. Every field is optional at the wire level so a
/// missing field is reported as a validation error naming that field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTradeRequest {
    pub ticker_symbol: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub broker_id: Option<String>,
}

/// Query of `GET /stocks`
#[derive(Debug, Default, Deserialize)]
pub struct ListStocksQuery {
    /// Comma-separated ticker symbols
    pub tickers: Option<String>,
}

impl ListStocksQuery {
    pub fn ticker_list(&self) -> Vec<&str> {
        self.tickers
            .as_deref()
            .map(|raw| raw.split(',').collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockResponse {
    pub ticker_symbol: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub average_price: Decimal,
}

impl From<Stock> for StockResponse {
    fn from(stock: Stock) -> Self {
        Self {
            ticker_symbol: stock.ticker_symbol,
            average_price: stock.average_price,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeResponse {
    pub id: i64,
    pub ticker_symbol: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub quantity: Decimal,
    pub broker_id: String,
    pub traded_at: DateTime<Utc>,
}

impl From<Trade> for TradeResponse {
    fn from(trade: Trade) -> Self {
        Self {
            id: trade.id,
            ticker_symbol: trade.ticker_symbol,
            price: trade.price,
            quantity: trade.quantity,
            broker_id: trade.broker_id,
            traded_at: trade.traded_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    pub message: String,
}
