//! Configuration management for the server.

use serde_json::Value;
use shelf_engine::{native_value, ResourceConfig};
use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Default page size for list requests without `_limit`
    pub paginate_by: Option<usize>,
    /// Whether `DELETE /{collection}` is allowed
    pub delete_collection_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            paginate_by: None,
            delete_collection_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        let paginate_by = match lookup("PAGINATE_BY") {
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => Some(size),
                _ => return Err(ConfigError::InvalidPaginateBy(raw)),
            },
            None => defaults.paginate_by,
        };

        let delete_collection_enabled = match lookup("DELETE_COLLECTION_ENABLED") {
            Some(raw) => match native_value(&raw) {
                Value::Bool(enabled) => enabled,
                _ => return Err(ConfigError::InvalidBoolean("DELETE_COLLECTION_ENABLED", raw)),
            },
            None => defaults.delete_collection_enabled,
        };

        Ok(Self {
            host,
            port,
            paginate_by,
            delete_collection_enabled,
        })
    }

    /// Settings handed to every resource.
    pub fn resource_config(&self) -> ResourceConfig {
        ResourceConfig {
            paginate_by: self.paginate_by,
            delete_collection_enabled: self.delete_collection_enabled,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),

    #[error("Invalid PAGINATE_BY value, expected a positive integer: {0}")]
    InvalidPaginateBy(String),

    #[error("Invalid {0} value, expected a boolean: {1}")]
    InvalidBoolean(&'static str, String),
}
