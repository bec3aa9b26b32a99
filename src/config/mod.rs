//! Configuration module for the trade ledger.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Server, Persistence, and Retry.

mod persistence_config;
mod retry_config;
mod server_config;

pub use persistence_config::{IN_MEMORY_DATABASE_URL, PersistenceEnvConfig};
pub use retry_config::RetryEnvConfig;
pub use server_config::ServerEnvConfig;

use anyhow::{Result, anyhow};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Source of configuration values, keyed by variable name
pub type Lookup = dyn Fn(&str) -> Option<String>;

/// Parse `key` if set and non-blank, otherwise fall back to `default`.
/// A value that is present but malformed is an error, never silently replaced.
pub(crate) fn parse_var<T>(lookup: &Lookup, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("Invalid {}: {:?} ({})", key, raw, e)),
        _ => Ok(default),
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerEnvConfig,
    pub persistence: PersistenceEnvConfig,
    pub retry: RetryEnvConfig,
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: &Lookup) -> Result<Self> {
        Ok(Self {
            server: ServerEnvConfig::from_lookup(lookup)?,
            persistence: PersistenceEnvConfig::from_lookup(lookup)?,
            retry: RetryEnvConfig::from_lookup(lookup)?,
        })
    }
}
