use crate::domain::errors::ValidationError;
use std::collections::HashSet;
use std::fmt;

pub const MAX_TICKER_LEN: usize = 10;

fn is_ticker_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '.' || c == '-'
}

/// Trimmed, upper-cased ticker symbol. Lookups are case-insensitive because
/// every path goes through this normalization first.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Normalizes a list of ticker filters, dropping blanks and duplicates while
/// keeping first-seen order.
pub fn normalize_filter<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .map(|entry| normalize(entry.as_ref()))
        .filter(|ticker| !ticker.is_empty())
        .filter(|ticker| seen.insert(ticker.clone()))
        .collect()
}

/// A validated ticker symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let ticker = normalize(raw);
        if ticker.is_empty() {
            return Err(ValidationError::Required {
                field: "tickerSymbol",
            });
        }
        if ticker.chars().count() > MAX_TICKER_LEN {
            return Err(ValidationError::TooLong {
                field: "tickerSymbol",
                max: MAX_TICKER_LEN,
            });
        }
        if !ticker.chars().all(is_ticker_char) {
            return Err(ValidationError::InvalidCharacters {
                field: "tickerSymbol",
            });
        }
        Ok(Self(ticker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
