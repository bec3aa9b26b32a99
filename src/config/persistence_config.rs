//! Database configuration parsing from environment variables.

use super::{Lookup, parse_var};
use anyhow::{Result, ensure};
use std::time::Duration;

/// `DATABASE_URL` value selecting the non-persistent in-memory store
pub const IN_MEMORY_DATABASE_URL: &str = "memory";

/// Persistence environment configuration
#[derive(Debug, Clone)]
pub struct PersistenceEnvConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// How long SQLite waits on a locked database before reporting busy
    pub busy_timeout: Duration,
    /// How long to wait for a free pooled connection
    pub acquire_timeout: Duration,
}

impl Default for PersistenceEnvConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://tradeledger.db".to_string(),
            max_connections: 5,
            busy_timeout: Duration::from_millis(5000),
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

impl PersistenceEnvConfig {
    pub fn from_lookup(lookup: &Lookup) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parse_var(lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            busy_timeout: Duration::from_millis(parse_var(
                lookup,
                "DATABASE_BUSY_TIMEOUT_MS",
                defaults.busy_timeout.as_millis() as u64,
            )?),
            acquire_timeout: Duration::from_millis(parse_var(
                lookup,
                "DATABASE_ACQUIRE_TIMEOUT_MS",
                defaults.acquire_timeout.as_millis() as u64,
            )?),
        };
        ensure!(
            config.max_connections > 0,
            "DATABASE_MAX_CONNECTIONS must be at least 1"
        );
        Ok(config)
    }

    pub fn uses_in_memory_store(&self) -> bool {
        self.database_url == IN_MEMORY_DATABASE_URL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_config_overrides() {
        let lookup = |key: &str| match key {
            "DATABASE_URL" => Some("sqlite://data/ledger.db".to_string()),
            "DATABASE_MAX_CONNECTIONS" => Some("12".to_string()),
            "DATABASE_BUSY_TIMEOUT_MS" => Some("250".to_string()),
            _ => None,
        };
        let config = PersistenceEnvConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.database_url, "sqlite://data/ledger.db");
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.uses_in_memory_store());
    }

    #[test]
    fn test_zero_connections_rejected() {
        let lookup = |key: &str| (key == "DATABASE_MAX_CONNECTIONS").then(|| "0".to_string());
        assert!(PersistenceEnvConfig::from_lookup(&lookup).is_err());
    }
}
