//! WebSocket message types for the chat relay.
//!
//! Defines the protocol between server and connected clients. Both
//! directions are JSON objects discriminated by a `type` field:
//! - Client → Server: join, leave, publish, history, ping
//! - Server → Client: connected, joined, left, delivered, history, error, pong

use serde::{Deserialize, Serialize};

use crate::application::relay::RelayEvent;
use crate::domain::chat::{ChatMessage, PublishRequest};
use crate::domain::foundation::{ConnectionId, Timestamp};

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established; carries the server-assigned connection id.
    Connected(ConnectedMessage),

    /// Subscription to a channel confirmed.
    Joined(ChannelMessage),

    /// Subscription to a channel removed.
    Left(ChannelMessage),

    /// A message published into one of the connection's channels.
    Delivered(DeliveredMessage),

    /// Reply to a history request.
    History(HistoryMessage),

    /// Error occurred while handling this connection's request.
    Error(ErrorMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

/// Sent once when the socket is upgraded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub connection_id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMessage {
    pub channel_id: String,
}

/// A relayed chat message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveredMessage {
    pub message_id: String,
    pub channel_id: String,
    pub sender: String,
    pub content: String,
    pub server_timestamp: String,
}

impl From<ChatMessage> for DeliveredMessage {
    fn from(message: ChatMessage) -> Self {
        Self {
            message_id: message.id.to_string(),
            channel_id: message.channel_id.to_string(),
            sender: message.sender_id.to_string(),
            content: message.content,
            server_timestamp: message.sent_at.to_rfc3339(),
        }
    }
}

/// History page, oldest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryMessage {
    pub channel_id: String,
    pub messages: Vec<DeliveredMessage>,
}

/// Error message sent to client.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

/// Heartbeat response.
#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

impl ServerMessage {
    pub fn connected(connection_id: &ConnectionId) -> Self {
        ServerMessage::Connected(ConnectedMessage {
            connection_id: connection_id.to_string(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }
}

impl From<RelayEvent> for ServerMessage {
    fn from(event: RelayEvent) -> Self {
        match event {
            RelayEvent::Joined { channel_id } => ServerMessage::Joined(ChannelMessage {
                channel_id: channel_id.to_string(),
            }),
            RelayEvent::Left { channel_id } => ServerMessage::Left(ChannelMessage {
                channel_id: channel_id.to_string(),
            }),
            RelayEvent::Delivered(message) => ServerMessage::Delivered(message.into()),
            RelayEvent::History {
                channel_id,
                messages,
            } => ServerMessage::History(HistoryMessage {
                channel_id: channel_id.to_string(),
                messages: messages.into_iter().map(DeliveredMessage::from).collect(),
            }),
            RelayEvent::Error { code, message } => ServerMessage::Error(ErrorMessage {
                code: code.to_string(),
                message,
                timestamp: Timestamp::now().to_rfc3339(),
            }),
            RelayEvent::Pong => ServerMessage::Pong(PongMessage {
                timestamp: Timestamp::now().to_rfc3339(),
            }),
        }
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
///
/// Required fields are optional here so that a missing field surfaces as a
/// validation error naming it, rather than as a parse failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to a channel.
    Join(ChannelRequest),

    /// Unsubscribe from a channel.
    Leave(ChannelRequest),

    /// Publish a message into a channel.
    Publish(PublishPayload),

    /// Fetch recent channel history.
    History(HistoryRequest),

    /// Heartbeat request.
    Ping,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelRequest {
    pub channel_id: Option<String>,
}

impl ChannelRequest {
    pub fn channel_id(&self) -> &str {
        self.channel_id.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublishPayload {
    pub channel_id: Option<String>,
    pub sender: Option<String>,
    pub content: Option<String>,
}

impl From<PublishPayload> for PublishRequest {
    fn from(payload: PublishPayload) -> Self {
        PublishRequest::new(
            payload.channel_id.unwrap_or_default(),
            payload.sender.unwrap_or_default(),
            payload.content.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryRequest {
    pub channel_id: Option<String>,
    pub limit: Option<usize>,
}
