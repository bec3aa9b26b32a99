//! Trade-recording retry and deadline configuration.

use super::{Lookup, parse_var};
use crate::application::trading::RetryPolicy;
use anyhow::{Result, ensure};
use std::time::Duration;

/// Retry environment configuration
#[derive(Debug, Clone)]
pub struct RetryEnvConfig {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Deadline for one trade, all attempts included
    pub operation_timeout: Duration,
}

impl Default for RetryEnvConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(20),
            max_delay: Duration::from_millis(500),
            operation_timeout: Duration::from_millis(10_000),
        }
    }
}

impl RetryEnvConfig {
    pub fn from_lookup(lookup: &Lookup) -> Result<Self> {
        let defaults = Self::default();
        let millis = |key: &str, default: Duration| -> Result<Duration> {
            Ok(Duration::from_millis(parse_var(
                lookup,
                key,
                default.as_millis() as u64,
            )?))
        };

        let config = Self {
            max_retries: parse_var(lookup, "TRADE_MAX_RETRIES", defaults.max_retries)?,
            initial_delay: millis("TRADE_RETRY_INITIAL_DELAY_MS", defaults.initial_delay)?,
            max_delay: millis("TRADE_RETRY_MAX_DELAY_MS", defaults.max_delay)?,
            operation_timeout: millis("TRADE_OPERATION_TIMEOUT_MS", defaults.operation_timeout)?,
        };
        ensure!(
            config.initial_delay <= config.max_delay,
            "TRADE_RETRY_INITIAL_DELAY_MS must not exceed TRADE_RETRY_MAX_DELAY_MS"
        );
        ensure!(
            !config.operation_timeout.is_zero(),
            "TRADE_OPERATION_TIMEOUT_MS must be positive"
        );
        Ok(config)
    }

    pub fn to_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay: self.initial_delay,
            max_delay: self.max_delay,
            jitter: true,
        }
    }
}
