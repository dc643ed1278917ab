//! Relay error taxonomy.

use thiserror::Error;

use crate::domain::foundation::{ConnectionId, ErrorCode, ValidationError};
use crate::ports::MessageStoreError;

/// Errors produced by relay operations.
///
/// None of these is fatal to the relay; each concerns one request.
#[derive(Debug, Clone, Error)]
pub enum RelayError {
    /// The request is missing a channel, sender or content, or is malformed.
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The message was delivered but could not be stored.
    #[error("Message could not be saved: {0}")]
    Persistence(#[from] MessageStoreError),

    /// The connection is no longer registered with the relay.
    #[error("Connection {0} is gone")]
    ConnectionGone(ConnectionId),
}

impl RelayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RelayError::Validation(_) => ErrorCode::ValidationFailed,
            RelayError::Persistence(_) => ErrorCode::PersistenceFailed,
            RelayError::ConnectionGone(_) => ErrorCode::ConnectionGone,
        }
    }

    /// Text safe to show the client. Storage internals stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            RelayError::Validation(err) => err.to_string(),
            RelayError::Persistence(_) => "Message was delivered but could not be saved".to_string(),
            RelayError::ConnectionGone(_) => "Connection is no longer registered".to_string(),
        }
    }
}
