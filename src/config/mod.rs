//! Application configuration
//!
//! Settings come from `GIGCHAT__`-prefixed environment variables (and a
//! `.env` file in development). Sections nest with `__`:
//!
//! | Variable | Field |
//! |---|---|
//! | `GIGCHAT__SERVER__BIND_ADDRESS=127.0.0.1:3000` | `server.bind_address` |
//! | `GIGCHAT__SERVER__CORS_ORIGINS=https://a.example,https://b.example` | `server.cors_origins` |
//! | `GIGCHAT__DATABASE__URL=postgres://...` | `database.url` |
//! | `GIGCHAT__RELAY__ECHO_POLICY=include_sender` | `relay.echo_policy` |
//!
//! ```no_run
//! use gigchat::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod relay;
mod server;

pub use database::{DatabaseConfig, StoreBackend};
pub use error::{ConfigError, ValidationError};
pub use relay::{EchoPolicy, RelayConfig};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration.
///
/// An empty environment yields a runnable development setup on the
/// in-memory message store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub relay: RelayConfig,
}

impl AppConfig {
    /// Reads `.env` if present, then the `GIGCHAT__` environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("GIGCHAT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Checks every section; the database section depends on the environment.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate(self.is_production())?;
        self.relay.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
