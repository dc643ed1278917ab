//! MessageStore port - durable history for chat channels.
//!
//! The relay hands every accepted message to this port after fan-out.
//! Implementations must not panic on storage failures; they surface them as
//! [`MessageStoreError`] so the relay can report them to the sender.

use async_trait::async_trait;

use crate::domain::chat::{ChannelSummary, ChatMessage};
use crate::domain::foundation::{ChannelId, SenderId};

/// Errors that can occur in message store operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MessageStoreError {
    /// Database communication error
    #[error("Database error: {0}")]
    Database(String),

    /// A stored row could not be mapped back to a message
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Port for persisting and reading channel message history.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Durably store a message.
    ///
    /// Returns the stored record, including its server-assigned timestamp.
    async fn store(&self, message: &ChatMessage) -> Result<ChatMessage, MessageStoreError>;

    /// Fetch the most recent `limit` messages of a channel.
    ///
    /// Results are in chronological order (oldest first).
    async fn history(
        &self,
        channel_id: &ChannelId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, MessageStoreError>;

    /// List every channel `sender` has published in, each with the newest
    /// message in that channel from any sender.
    ///
    /// Results are ordered most recently active first.
    async fn channels_for_sender(
        &self,
        sender: &SenderId,
    ) -> Result<Vec<ChannelSummary>, MessageStoreError>;
}
