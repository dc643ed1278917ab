//! Configuration error types

use thiserror::Error;

/// Failure to read configuration from the environment
#[derive(Debug, Error)]
#[error("Failed to read configuration: {0}")]
pub struct ConfigError(#[from] config::ConfigError);

/// A configuration value that was read but cannot be used
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: &'static str,
        min: u64,
        max: u64,
        actual: u64,
    },

    #[error("database.url is required in production")]
    DatabaseRequired,

    #[error("database.url must use the postgres:// or postgresql:// scheme")]
    UnsupportedDatabaseUrl,

    #[error("relay.history_default_limit ({default}) exceeds relay.history_max_limit ({max})")]
    HistoryDefaultAboveMax { default: usize, max: usize },
}

impl ValidationError {
    /// Checks `actual` against an inclusive range.
    pub(super) fn ensure_range(
        field: &'static str,
        actual: u64,
        min: u64,
        max: u64,
    ) -> Result<(), Self> {
        if (min..=max).contains(&actual) {
            Ok(())
        } else {
            Err(Self::OutOfRange {
                field,
                min,
                max,
                actual,
            })
        }
    }
}
