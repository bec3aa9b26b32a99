//! Field rules for incoming trades.
//!
//! Amounts must fit the persisted DECIMAL(18,4) columns: strictly positive,
//! at most four fractional digits, below 10^14.

use crate::domain::errors::ValidationError;
use rust_decimal::Decimal;

pub const MAX_BROKER_ID_LEN: usize = 50;
pub const MAX_AMOUNT_DECIMAL_PLACES: u32 = 4;

/// Exclusive upper bound for price and quantity
pub fn amount_limit() -> Decimal {
    Decimal::from(100_000_000_000_000_i64)
}

pub fn validate_amount(field: &'static str, value: Decimal) -> Result<Decimal, ValidationError> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::NotPositive { field });
    }
    let limit = amount_limit();
    if value >= limit {
        return Err(ValidationError::OutOfRange { field, limit });
    }
    if value.normalize().scale() > MAX_AMOUNT_DECIMAL_PLACES {
        return Err(ValidationError::TooPrecise {
            field,
            max: MAX_AMOUNT_DECIMAL_PLACES,
        });
    }
    Ok(value)
}

pub fn validate_broker_id(raw: &str) -> Result<String, ValidationError> {
    let broker_id = raw.trim();
    if broker_id.is_empty() {
        return Err(ValidationError::Required { field: "brokerId" });
    }
    if broker_id.chars().count() > MAX_BROKER_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "brokerId",
            max: MAX_BROKER_ID_LEN,
        });
    }
    Ok(broker_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_must_be_positive() {
        assert_eq!(
            validate_amount("price", dec!(0)),
            Err(ValidationError::NotPositive { field: "price" })
        );
        assert_eq!(
            validate_amount("quantity", dec!(-1.5)),
            Err(ValidationError::NotPositive { field: "quantity" })
        );
        assert_eq!(validate_amount("price", dec!(0.0001)), Ok(dec!(0.0001)));
    }

    #[test]
    fn test_amount_precision() {
        // Trailing zeros do not count
        assert!(validate_amount("price", dec!(12.340000)).is_ok());
        assert_eq!(
            validate_amount("price", dec!(0.00001)),
            Err(ValidationError::TooPrecise {
                field: "price",
                max: 4
            })
        );
    }

    #[test]
    fn test_amount_upper_bound() {
        assert!(validate_amount("quantity", dec!(99999999999999.9999)).is_ok());
        assert!(matches!(
            validate_amount("quantity", dec!(100000000000000)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_broker_id_rules() {
        assert_eq!(validate_broker_id("  B1 "), Ok("B1".to_string()));
        assert_eq!(
            validate_broker_id(""),
            Err(ValidationError::Required { field: "brokerId" })
        );
        assert!(validate_broker_id(&"x".repeat(50)).is_ok());
        assert_eq!(
            validate_broker_id(&"x".repeat(51)),
            Err(ValidationError::TooLong {
                field: "brokerId",
                max: 50
            })
        );
    }
}
