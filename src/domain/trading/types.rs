use crate::domain::errors::ValidationError;
use crate::domain::trading::ticker::Ticker;
use crate::domain::validation::trade_input::{validate_amount, validate_broker_id};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

pub type StockId = i64;
pub type TradeId = i64;

/// Fractional digits kept on the published average price
pub const AVERAGE_PRICE_SCALE: u32 = 8;

/// Per-ticker aggregate summarizing every trade recorded against it.
///
/// `total_value` (sum of price x quantity) is kept next to `total_volume`, so
/// the average is always derived from exact running totals rather than from
/// a previously rounded average.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stock {
    pub id: StockId,
    pub ticker_symbol: String,
    pub average_price: Decimal,
    pub total_volume: Decimal,
    pub total_value: Decimal,
    /// Row version, bumped on every aggregate update
    pub version: i64,
    pub last_updated: DateTime<Utc>,
}

impl Stock {
    /// Aggregate state after folding in one more trade.
    ///
    /// Returns `None` if the running totals would overflow.
    pub fn apply_trade(
        &self,
        price: Decimal,
        quantity: Decimal,
        at: DateTime<Utc>,
    ) -> Option<Stock> {
        let total_value = price
            .checked_mul(quantity)
            .and_then(|value| self.total_value.checked_add(value))?;
        let total_volume = self.total_volume.checked_add(quantity)?;
        // total_volume > 0: quantity is validated positive
        let average_price = total_value
            .checked_div(total_volume)?
            .round_dp(AVERAGE_PRICE_SCALE)
            .normalize();

        Some(Stock {
            id: self.id,
            ticker_symbol: self.ticker_symbol.clone(),
            average_price,
            total_volume,
            total_value,
            version: self.version + 1,
            last_updated: at,
        })
    }
}

/// Immutable record of one executed trade
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trade {
    pub id: TradeId,
    pub stock_id: StockId,
    pub ticker_symbol: String,
    pub price: Decimal,
    pub quantity: Decimal,
    pub broker_id: String,
    pub traded_at: DateTime<Utc>,
}

/// Validated input for recording a trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrade {
    pub ticker: Ticker,
    pub price: Decimal,
    pub quantity: Decimal,
    pub broker_id: String,
}

impl NewTrade {
    pub fn new(
        ticker: &str,
        price: Decimal,
        quantity: Decimal,
        broker_id: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            ticker: Ticker::parse(ticker)?,
            price: validate_amount("price", price)?,
            quantity: validate_amount("quantity", quantity)?,
            broker_id: validate_broker_id(broker_id)?,
        })
    }
}
