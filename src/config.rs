//! Layered configuration for the task store.
//!
//! Configuration sources, highest priority first:
//! 1. Environment variables with the `TASKSTORE_` prefix
//!    (`TASKSTORE_DATABASE_URL` maps to `database_url`)
//! 2. Built-in defaults

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Environment variable prefix read by [`StoreConfig::figment`].
pub const ENV_PREFIX: &str = "TASKSTORE_";

/// Largest statement timeout `PostgreSQL` accepts, in milliseconds.
pub const MAX_STATEMENT_TIMEOUT_MS: u64 = 2_147_483_647;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration source could not be parsed into [`StoreConfig`].
    #[error("invalid task store configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    /// A setting holds a value the connection pool cannot use.
    #[error("invalid task store setting `{setting}`: {reason}")]
    Invalid {
        /// Name of the offending setting.
        setting: &'static str,
        /// What is wrong with its value.
        reason: &'static str,
    },
}

/// Connection settings for the task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    database_url: String,
    max_connections: u32,
    connect_timeout_secs: u64,
    statement_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/tasks".to_owned(),
            max_connections: 10,
            connect_timeout_secs: 30,
            statement_timeout_ms: 0,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration for `database_url` with default pool settings.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from defaults and `TASKSTORE_*` variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Extract`] when a variable has the wrong type and
    /// [`ConfigError::Invalid`] when a value fails [`StoreConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|err| ConfigError::Extract(Box::new(err)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the pool settings are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the pool size or connect timeout
    /// is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                setting: "max_connections",
                reason: "the pool needs at least one connection",
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                setting: "connect_timeout_secs",
                reason: "the connect timeout must be at least one second",
            });
        }
        Ok(())
    }

    /// Loads a `.env` file from the working directory, if present, then
    /// behaves like [`StoreConfig::load`].
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`StoreConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            tracing::debug!(error = %err, "no .env file loaded");
        }
        Self::load()
    }

    /// Builds the provider chain used by [`StoreConfig::load`].
    #[must_use]
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Sets the maximum number of pooled connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets how long a caller waits for a pooled connection.
    ///
    /// Partial seconds round up.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs();
        self.connect_timeout_secs = if timeout.subsec_nanos() > 0 {
            secs.saturating_add(1)
        } else {
            secs
        };
        self
    }

    /// Sets the server-side statement timeout. A zero duration disables it.
    ///
    /// Values above [`MAX_STATEMENT_TIMEOUT_MS`] are clamped.
    #[must_use]
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout_ms = u64::try_from(timeout.as_millis())
            .unwrap_or(u64::MAX)
            .min(MAX_STATEMENT_TIMEOUT_MS);
        self
    }

    /// Returns the `PostgreSQL` connection string.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    /// Returns how long a caller waits for a pooled connection.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the statement timeout, or `None` when disabled.
    #[must_use]
    pub const fn statement_timeout(&self) -> Option<Duration> {
        if self.statement_timeout_ms == 0 {
            return None;
        }
        let millis = if self.statement_timeout_ms > MAX_STATEMENT_TIMEOUT_MS {
            MAX_STATEMENT_TIMEOUT_MS
        } else {
            self.statement_timeout_ms
        };
        Some(Duration::from_millis(millis))
    }
}
