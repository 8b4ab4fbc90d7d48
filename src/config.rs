// src/config.rs

use std::{env, net::SocketAddr, path::PathBuf};

use dotenvy::dotenv;
use thiserror::Error;

use crate::engine::scoring::PassThreshold;

/// Fraction of correct answers needed to pass a step quiz when `PASS_THRESHOLD` is unset.
pub const DEFAULT_PASS_THRESHOLD: f64 = 0.6;

pub const DEFAULT_CATALOG_PATH: &str = "catalog/roadmaps.json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Where attempts and unlock state are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub storage: StorageBackend,
    pub jwt_secret: String,
    pub rust_log: String,
    pub catalog_path: PathBuf,
    pub pass_threshold: PassThreshold,
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").filter(|v| !v.is_empty());

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let storage = match lookup("STORAGE_BACKEND") {
            Some(value) => parse_storage(&value)?,
            None if database_url.is_some() => StorageBackend::Postgres,
            None => StorageBackend::Memory,
        };
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let catalog_path: PathBuf = lookup("CATALOG_PATH")
            .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string())
            .into();

        let pass_threshold = match lookup("PASS_THRESHOLD") {
            Some(raw) => parse_threshold(&raw)?,
            None => parse_threshold(&DEFAULT_PASS_THRESHOLD.to_string())?,
        };

        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                value: raw_addr.clone(),
                reason: e.to_string(),
            })?;

        let cors_origins = parse_origins(
            &lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
        );

        Ok(Self {
            database_url,
            storage,
            jwt_secret,
            rust_log,
            catalog_path,
            pass_threshold,
            bind_addr,
            cors_origins,
        })
    }
}

fn parse_storage(value: &str) -> Result<StorageBackend, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
        "memory" => Ok(StorageBackend::Memory),
        other => Err(ConfigError::Invalid {
            name: "STORAGE_BACKEND",
            value: other.to_string(),
            reason: "expected 'postgres' or 'memory'".to_string(),
        }),
    }
}

fn parse_threshold(raw: &str) -> Result<PassThreshold, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: "PASS_THRESHOLD",
        value: raw.to_string(),
        reason,
    };
    let fraction = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(e.to_string()))?;
    PassThreshold::new(fraction).map_err(invalid)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_missing_jwt_secret_is_an_error() {
        let err = config_from(&[("DATABASE_URL", "postgres://localhost/lernify")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_storage_defaults_to_memory_without_database_url() {
        let config = config_from(&[("JWT_SECRET", "secret")]).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(config.database_url.is_none());
        assert_eq!(config.pass_threshold.fraction(), DEFAULT_PASS_THRESHOLD);
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.catalog_path, PathBuf::from(DEFAULT_CATALOG_PATH));
    }

    #[test]
    fn test_storage_defaults_to_postgres_with_database_url() {
        let config = config_from(&[
            ("JWT_SECRET", "secret"),
            ("DATABASE_URL", "postgres://localhost/lernify"),
        ])
        .unwrap();
        assert_eq!(config.storage, StorageBackend::Postgres);
    }

    #[test]
    fn test_empty_database_url_counts_as_unset() {
        let config = config_from(&[("JWT_SECRET", "secret"), ("DATABASE_URL", "")]).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
    }

    #[test]
    fn test_postgres_backend_requires_database_url() {
        let err = config_from(&[("JWT_SECRET", "secret"), ("STORAGE_BACKEND", "postgres")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_explicit_memory_backend_ignores_database_url() {
        let config = config_from(&[
            ("JWT_SECRET", "secret"),
            ("DATABASE_URL", "postgres://localhost/lernify"),
            ("STORAGE_BACKEND", "memory"),
        ])
        .unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
    }

    #[test]
    fn test_invalid_bind_addr_is_rejected() {
        let err = config_from(&[("JWT_SECRET", "secret"), ("BIND_ADDR", "localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "BIND_ADDR", .. }));
    }

    #[test]
    fn test_parse_storage() {
        assert_eq!(parse_storage("Postgres").unwrap(), StorageBackend::Postgres);
        assert_eq!(parse_storage(" memory ").unwrap(), StorageBackend::Memory);
        assert!(parse_storage("redis").is_err());
    }

    #[test]
    fn test_parse_threshold_bounds() {
        assert_eq!(parse_threshold("0.5").unwrap().fraction(), 0.5);
        assert_eq!(parse_threshold("1").unwrap().fraction(), 1.0);
        assert!(parse_threshold("0").is_err());
        assert!(parse_threshold("1.5").is_err());
        assert!(parse_threshold("sixty").is_err());
    }

    #[test]
    fn test_parse_origins_skips_blanks() {
        let origins = parse_origins("http://a.test, ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }
}
