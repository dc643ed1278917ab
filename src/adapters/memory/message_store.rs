//! In-Memory Message Store Adapter
//!
//! Keeps channel history in process memory.
//! Used when no database is configured (development) and in tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::chat::{sort_by_recent_activity, ChannelSummary, ChatMessage};
use crate::domain::foundation::{ChannelId, SenderId};
use crate::ports::{MessageStore, MessageStoreError};

/// In-memory storage for chat messages, grouped by channel
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageStore {
    channels: Arc<RwLock<HashMap<ChannelId, Vec<ChatMessage>>>>,
}

impl InMemoryMessageStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn store(&self, message: &ChatMessage) -> Result<ChatMessage, MessageStoreError> {
        let mut channels = self.channels.write().await;
        let history = channels.entry(message.channel_id.clone()).or_default();

        // Keep chronological order even if timestamps tie or arrive late.
        let position = history.partition_point(|m| m.sent_at <= message.sent_at);
        history.insert(position, message.clone());

        Ok(message.clone())
    }

    async fn history(
        &self,
        channel_id: &ChannelId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, MessageStoreError> {
        let channels = self.channels.read().await;
        let messages = channels
            .get(channel_id)
            .map(|history| {
                let start = history.len().saturating_sub(limit);
                history[start..].to_vec()
            })
            .unwrap_or_default();
        Ok(messages)
    }

    async fn channels_for_sender(
        &self,
        sender: &SenderId,
    ) -> Result<Vec<ChannelSummary>, MessageStoreError> {
        let channels = self.channels.read().await;
        let mut summaries: Vec<ChannelSummary> = channels
            .values()
            .filter(|history| history.iter().any(|m| &m.sender_id == sender))
            .filter_map(|history| history.last().cloned())
            .map(ChannelSummary::new)
            .collect();
        sort_by_recent_activity(&mut summaries);
        Ok(summaries)
    }
}
