//! HTTP listener settings

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

/// Where and how the HTTP/WebSocket listener runs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener address, e.g. `0.0.0.0:8080`
    pub bind_address: SocketAddr,

    pub environment: Environment,

    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,

    /// Deadline for plain HTTP requests; upgraded sockets are not bound by it
    pub request_timeout_secs: u64,

    /// Browser origins allowed by CORS; empty allows any origin
    pub cors_origins: Vec<String>,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl ServerConfig {
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::ensure_range(
            "server.request_timeout_secs",
            self.request_timeout_secs,
            1,
            300,
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080)),
            environment: Environment::Development,
            log_filter: "info,gigchat=debug,sqlx=warn,tower_http=info".to_string(),
            request_timeout_secs: 30,
            cors_origins: Vec::new(),
        }
    }
}
