//! Message store selection

use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

/// PostgreSQL settings for the message store.
///
/// Without a `url` the relay keeps history in process memory, which is only
/// accepted outside production.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Apply `migrations/` before serving
    pub run_migrations: bool,
}

/// Which message store the server should build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend<'a> {
    InMemory,
    Postgres { url: &'a str },
}

impl DatabaseConfig {
    /// A blank url counts as unset.
    pub fn backend(&self) -> StoreBackend<'_> {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => StoreBackend::Postgres { url },
            _ => StoreBackend::InMemory,
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        match self.backend() {
            StoreBackend::InMemory if production => Err(ValidationError::DatabaseRequired),
            StoreBackend::InMemory => Ok(()),
            StoreBackend::Postgres { url } => {
                if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                    return Err(ValidationError::UnsupportedDatabaseUrl);
                }
                ValidationError::ensure_range(
                    "database.max_connections",
                    u64::from(self.max_connections),
                    1,
                    100,
                )
            }
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 30,
            run_migrations: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn missing_url_falls_back_to_memory_outside_production() {
        let config = DatabaseConfig::default();
        assert_eq!(config.backend(), StoreBackend::InMemory);
        assert!(config.validate(false).is_ok());
    }

    #[test]
    fn blank_url_counts_as_missing() {
        let config = with_url("   ");
        assert_eq!(config.backend(), StoreBackend::InMemory);
        assert_eq!(config.validate(true), Err(ValidationError::DatabaseRequired));
    }

    #[test]
    fn url_selects_postgres() {
        let config = with_url(" postgres://chat@localhost/gigchat ");
        assert_eq!(
            config.backend(),
            StoreBackend::Postgres {
                url: "postgres://chat@localhost/gigchat"
            }
        );
        assert!(config.validate(true).is_ok());
    }

    #[test]
    fn non_postgres_url_is_rejected() {
        assert_eq!(
            with_url("mysql://localhost/gigchat").validate(false),
            Err(ValidationError::UnsupportedDatabaseUrl)
        );
    }

    #[test]
    fn pool_size_must_be_positive() {
        let config = DatabaseConfig {
            max_connections: 0,
            ..with_url("postgresql://localhost/gigchat")
        };
        assert!(matches!(
            config.validate(false),
            Err(ValidationError::OutOfRange { field: "database.max_connections", .. })
        ));
    }
}
