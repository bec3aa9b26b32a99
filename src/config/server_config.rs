//! HTTP server configuration parsing from environment variables.

use super::{Lookup, parse_var};
use anyhow::Result;
use std::time::Duration;

/// Server environment configuration
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub bind_address: String,
    pub port: u16,
    /// Upper bound for handling any single HTTP request
    pub request_timeout: Duration,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerEnvConfig {
    pub fn from_lookup(lookup: &Lookup) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            bind_address: lookup("SERVER_BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: parse_var(lookup, "SERVER_PORT", defaults.port)?,
            request_timeout: Duration::from_secs(parse_var(
                lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerEnvConfig::from_lookup(&|_| None).unwrap();
        assert_eq!(config.address(), "127.0.0.1:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_server_config_rejects_bad_port() {
        let lookup = |key: &str| (key == "SERVER_PORT").then(|| "http".to_string());
        let err = ServerEnvConfig::from_lookup(&lookup).unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));
    }
}
