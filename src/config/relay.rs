//! Room relay configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Room relay configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Capacity of each connection's outbound queue.
    /// A connection whose queue fills up is dropped as a slow consumer.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,

    /// Whether a publisher receives its own message back
    #[serde(default)]
    pub echo_policy: EchoPolicy,

    /// Maximum message content length in characters
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,

    /// History page size when the client does not ask for one
    #[serde(default = "default_history_default_limit")]
    pub history_default_limit: usize,

    /// Upper bound on a requested history page size
    #[serde(default = "default_history_max_limit")]
    pub history_max_limit: usize,
}

/// Delivery policy for the publishing connection itself
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EchoPolicy {
    /// The client appends its own message optimistically; the relay skips it.
    #[default]
    ExcludeSender,
    /// The relay delivers to the sender like any other member.
    IncludeSender,
}

impl RelayConfig {
    /// Resolve a requested history page size against the configured bounds
    pub fn history_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.history_default_limit)
            .clamp(1, self.history_max_limit)
    }

    /// Validate relay configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::ensure_range("relay.outbound_buffer", self.outbound_buffer as u64, 1, 65_536)?;
        ValidationError::ensure_range(
            "relay.max_content_length",
            self.max_content_length as u64,
            1,
            65_536,
        )?;
        ValidationError::ensure_range("relay.history_max_limit", self.history_max_limit as u64, 1, 1_000)?;
        if self.history_default_limit == 0 || self.history_default_limit > self.history_max_limit {
            return Err(ValidationError::HistoryDefaultAboveMax {
                default: self.history_default_limit,
                max: self.history_max_limit,
            });
        }
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            outbound_buffer: default_outbound_buffer(),
            echo_policy: EchoPolicy::default(),
            max_content_length: default_max_content_length(),
            history_default_limit: default_history_default_limit(),
            history_max_limit: default_history_max_limit(),
        }
    }
}

fn default_outbound_buffer() -> usize {
    128
}

fn default_max_content_length() -> usize {
    4000
}

fn default_history_default_limit() -> usize {
    50
}

fn default_history_max_limit() -> usize {
    100
}
