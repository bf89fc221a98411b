//! Configuration management for the demo.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use ticket_queue_postgres::PostgresConfig;

/// Secret used when `ADMIN_SECRET` is unset. Development only.
pub const DEFAULT_ADMIN_SECRET: &str = "Prueba123";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,ticket_queue=debug,sqlx=warn";

/// Demo configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Which ticket store to run against
    pub store: StoreBackend,
    /// `PostgreSQL` configuration, used when `store` is `Postgres`
    pub postgres: PostgresConfig,
    /// Admin gate configuration
    pub admin: AdminConfig,
    /// Tracing filter directives
    pub log_filter: String,
}

/// Ticket store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local store; tickets vanish on exit
    #[default]
    Memory,
    /// `PostgreSQL` store
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Postgres => write!(f, "postgres"),
        }
    }
}

/// Admin gate configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Shared secret for the admin view
    pub secret: String,
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = PostgresConfig::default();

        Self {
            store: lookup("TICKET_STORE")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            postgres: PostgresConfig {
                url: lookup("DATABASE_URL").unwrap_or(defaults.url),
                max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.max_connections),
                connect_timeout: lookup("DATABASE_CONNECT_TIMEOUT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.connect_timeout),
            },
            admin: AdminConfig {
                secret: lookup("ADMIN_SECRET")
                    .unwrap_or_else(|| DEFAULT_ADMIN_SECRET.to_string()),
            },
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}
