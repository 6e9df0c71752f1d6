// ⚙️ Configuration - bind address and log filter from the environment

use anyhow::{Context, Result};
use std::net::SocketAddr;

pub const ADDR_VAR: &str = "PRODUCT_REGISTRY_ADDR";
pub const LOG_VAR: &str = "PRODUCT_REGISTRY_LOG";

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Where `product-server` listens
    pub bind_addr: SocketAddr,

    /// `tracing_subscriber::EnvFilter` directive string
    pub log_filter: String,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    ///
    /// Log filter precedence: `PRODUCT_REGISTRY_LOG`, then `RUST_LOG`, then `warn`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let bind_addr = addr
            .trim()
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid {}: '{}'", ADDR_VAR, addr))?;

        let log_filter = lookup(LOG_VAR)
            .or_else(|| lookup("RUST_LOG"))
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Config {
            bind_addr,
            log_filter,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_explicit_values() {
        let config = Config::from_lookup(lookup_from(&[
            (ADDR_VAR, "0.0.0.0:8080"),
            (LOG_VAR, "product_registry=debug"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.log_filter, "product_registry=debug");
    }

    #[test]
    fn test_rust_log_fallback() {
        let config = Config::from_lookup(lookup_from(&[("RUST_LOG", "info")])).unwrap();
        assert_eq!(config.log_filter, "info");

        let config = Config::from_lookup(lookup_from(&[("RUST_LOG", "info"), (LOG_VAR, "trace")]))
            .unwrap();
        assert_eq!(config.log_filter, "trace");
    }

    #[test]
    fn test_invalid_address() {
        let err = Config::from_lookup(lookup_from(&[(ADDR_VAR, "not-an-addr")])).unwrap_err();

        assert!(err.to_string().contains("not-an-addr"));
    }
}
