//! Events the relay pushes into a connection's outbox.

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{ChannelId, ErrorCode};

use super::RelayError;

/// Internal representation of everything a connection can be sent.
///
/// The transport adapter converts these into its wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// Subscription acknowledged.
    Joined { channel_id: ChannelId },

    /// Unsubscription acknowledged.
    Left { channel_id: ChannelId },

    /// A message published into a channel the connection belongs to.
    Delivered(ChatMessage),

    /// Reply to an explicit history request.
    History {
        channel_id: ChannelId,
        messages: Vec<ChatMessage>,
    },

    /// Failure of a request made by this connection.
    Error { code: ErrorCode, message: String },

    /// Heartbeat reply.
    Pong,
}

impl RelayEvent {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        RelayEvent::Error {
            code,
            message: message.into(),
        }
    }

    /// True for message deliveries, as opposed to acknowledgements and replies.
    pub fn is_delivery(&self) -> bool {
        matches!(self, RelayEvent::Delivered(_))
    }
}

impl From<&RelayError> for RelayEvent {
    fn from(err: &RelayError) -> Self {
        RelayEvent::error(err.code(), err.client_message())
    }
}
