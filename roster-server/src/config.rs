//! Runtime configuration
//!
//! Values are gathered by the CLI (flags, environment, `.env`) and checked
//! here. Every setting is required: an empty URL or a zero number is
//! rejected before anything connects.

use std::net::SocketAddr;
use std::time::Duration;

use crate::service::ServiceConfig;

/// Configuration error
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub url: String,
    /// Per-call timeout for repository operations, in milliseconds
    pub timeout_ms: u64,
    /// Upper bound on open connections
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_idle: u32,
    /// Recycle a connection after this many seconds
    pub max_lifetime_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/roster".to_string(),
            timeout_ms: 3000,
            max_connections: 10,
            min_idle: 2,
            max_lifetime_secs: 300,
        }
    }
}

impl DatabaseConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Full application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    /// Outer deadline for each HTTP request, in seconds
    pub api_timeout_secs: u64,
    /// Page size used when a listing request leaves `limit` at zero
    pub default_limit: i64,
    pub bind_addr: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            api_timeout_secs: 10,
            default_limit: 10,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 9999)),
        }
    }
}

impl AppConfig {
    /// Reject missing or zero settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if self.database.timeout_ms == 0 {
            return Err(ConfigError::Zero("DB_TIMEOUT_MS"));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Zero("DB_MAX_CONNECTIONS"));
        }
        if self.database.min_idle == 0 {
            return Err(ConfigError::Zero("DB_MIN_IDLE"));
        }
        if self.database.max_lifetime_secs == 0 {
            return Err(ConfigError::Zero("DB_MAX_LIFETIME_SECS"));
        }
        if self.api_timeout_secs == 0 {
            return Err(ConfigError::Zero("API_TIMEOUT_SECS"));
        }
        if self.default_limit <= 0 {
            return Err(ConfigError::Zero("DEFAULT_LIMIT"));
        }
        Ok(())
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn service(&self) -> ServiceConfig {
        ServiceConfig {
            default_limit: self.default_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.bind_addr.port(), 9999);
    }

    #[test]
    fn rejects_empty_url() {
        let mut config = AppConfig::default();
        config.database.url = "  ".into();
        assert_eq!(config.validate(), Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn rejects_zero_values() {
        let mut config = AppConfig::default();
        config.default_limit = 0;
        assert_eq!(config.validate(), Err(ConfigError::Zero("DEFAULT_LIMIT")));

        let mut config = AppConfig::default();
        config.database.timeout_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::Zero("DB_TIMEOUT_MS")));
    }

    #[test]
    fn durations() {
        let config = AppConfig::default();
        assert_eq!(config.api_timeout(), Duration::from_secs(10));
        assert_eq!(config.database.call_timeout(), Duration::from_millis(3000));
    }
}
