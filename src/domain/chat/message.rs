//! Chat message records and the publish request that produces them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelId, MessageId, SenderId, Timestamp, ValidationError};

/// A message published into a channel.
///
/// `sent_at` is assigned by the server when the publish is accepted; client
/// clocks are never trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub sender_id: SenderId,
    pub content: String,
    pub sent_at: Timestamp,
}

impl ChatMessage {
    /// Creates a new message stamped with the current server time.
    pub fn new(channel_id: ChannelId, sender_id: SenderId, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            channel_id,
            sender_id,
            content: content.into(),
            sent_at: Timestamp::now(),
        }
    }

    /// Reconstitutes a message loaded from storage.
    pub fn reconstitute(
        id: MessageId,
        channel_id: ChannelId,
        sender_id: SenderId,
        content: String,
        sent_at: Timestamp,
    ) -> Self {
        Self {
            id,
            channel_id,
            sender_id,
            content,
            sent_at,
        }
    }
}

/// Unvalidated publish request as received from a client.
///
/// Missing fields arrive as empty strings and are rejected by [`validate`].
///
/// [`validate`]: PublishRequest::validate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishRequest {
    pub channel_id: String,
    pub sender: String,
    pub content: String,
}

impl PublishRequest {
    pub fn new(
        channel_id: impl Into<String>,
        sender: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            sender: sender.into(),
            content: content.into(),
        }
    }

    /// Checks required fields and the content length limit.
    ///
    /// Content is kept verbatim; only whitespace-only content is rejected.
    pub fn validate(&self, max_content_length: usize) -> Result<ValidatedPublish, ValidationError> {
        let channel_id = ChannelId::parse(&self.channel_id)?;
        let sender_id = SenderId::parse(&self.sender)?;

        if self.content.trim().is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        let len = self.content.chars().count();
        if len > max_content_length {
            return Err(ValidationError::too_long("content", max_content_length, len));
        }

        Ok(ValidatedPublish {
            channel_id,
            sender_id,
            content: self.content.clone(),
        })
    }
}

/// A publish request that passed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPublish {
    pub channel_id: ChannelId,
    pub sender_id: SenderId,
    pub content: String,
}

impl ValidatedPublish {
    /// Stamps the request into a message record.
    pub fn into_message(self) -> ChatMessage {
        ChatMessage::new(self.channel_id, self.sender_id, self.content)
    }
}
