use std::env;
use std::str::FromStr;
use std::time::Duration;

use store::{DEFAULT_SERIALIZATION_RETRIES, StoreConfig};

use crate::error::ErrorStatusMode;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub error_status: ErrorStatusMode,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            store: StoreConfig {
                database_url,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
                acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?),
                statement_timeout: Duration::from_millis(parse_or(
                    &lookup,
                    "DB_STATEMENT_TIMEOUT_MS",
                    5000,
                )?),
                serialization_retries: parse_or(
                    &lookup,
                    "DB_SERIALIZATION_RETRIES",
                    DEFAULT_SERIALIZATION_RETRIES,
                )?,
            },
            error_status: parse_or(&lookup, "ERROR_STATUS_MODE", ErrorStatusMode::default())?,
        })
    }
}

fn parse_or<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/wallets")]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.store.max_connections, 10);
        assert_eq!(config.store.acquire_timeout, Duration::from_secs(5));
        assert_eq!(config.store.statement_timeout, Duration::from_millis(5000));
        assert_eq!(config.store.serialization_retries, DEFAULT_SERIALIZATION_RETRIES);
        assert_eq!(config.error_status, ErrorStatusMode::Differentiated);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("DATABASE_URL", "postgres://db/wallets"),
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("DB_MAX_CONNECTIONS", "32"),
            ("DB_STATEMENT_TIMEOUT_MS", "250"),
            ("ERROR_STATUS_MODE", "uniform"),
        ])
        .unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.store.max_connections, 32);
        assert_eq!(config.store.statement_timeout, Duration::from_millis(250));
        assert_eq!(config.error_status, ErrorStatusMode::Uniform);
    }

    #[test]
    fn test_missing_database_url() {
        assert!(matches!(config(&[]), Err(ConfigError::Missing("DATABASE_URL"))));
        assert!(matches!(
            config(&[("DATABASE_URL", "")]),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn test_invalid_port() {
        let err = config(&[("DATABASE_URL", "postgres://db"), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }
}
