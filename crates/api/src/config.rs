//! Application configuration loaded from environment variables.

use domain::{Limits, Validator};

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DATABASE_URL`: PostgreSQL connection string; unset runs on the in-memory store
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: `10`)
/// - `MAX_PAGE_SIZE`: upper bound on listing limits (default: `100`)
/// - `MAX_LINE_QUANTITY`: largest quantity per requested line (default: `1000`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub max_page_size: usize,
    pub max_line_quantity: u32,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(lookup("PORT"), defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            database_max_connections: parse_or(
                lookup("DATABASE_MAX_CONNECTIONS"),
                defaults.database_max_connections,
            ),
            max_page_size: parse_or(lookup("MAX_PAGE_SIZE"), defaults.max_page_size).max(1),
            max_line_quantity: parse_or(lookup("MAX_LINE_QUANTITY"), defaults.max_line_quantity),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the request validator from the configured limits.
    pub fn validator(&self) -> Validator {
        Validator::new(Limits {
            max_line_quantity: self.max_line_quantity,
        })
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            database_max_connections: 10,
            max_page_size: 100,
            max_line_quantity: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert!(config.database_url.is_none());
        assert_eq!(config.max_page_size, 100);
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_reads_overrides() {
        let config = from_map(&[
            ("PORT", "8081"),
            ("DATABASE_URL", "postgres://localhost/food"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("MAX_PAGE_SIZE", "25"),
            ("MAX_LINE_QUANTITY", "50"),
        ]);
        assert_eq!(config.port, 8081);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/food")
        );
        assert_eq!(config.database_max_connections, 4);
        assert_eq!(config.max_page_size, 25);
        assert_eq!(config.validator().limits().max_line_quantity, 50);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = from_map(&[("PORT", "not-a-port"), ("MAX_PAGE_SIZE", "0"), ("DATABASE_URL", "")]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_page_size, 1);
        assert!(config.database_url.is_none());
    }
}
