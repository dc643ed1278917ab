//! ListSenderChannels query handler.
//!
//! Backs a sender's conversation list: every channel they have posted in,
//! with the latest message, most recently active first.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::chat::ChannelSummary;
use crate::domain::foundation::{SenderId, ValidationError};
use crate::ports::{MessageStore, MessageStoreError};

/// Query for the channels a sender participates in.
#[derive(Debug, Clone)]
pub struct ListSenderChannelsQuery {
    /// Raw sender id as supplied by the client.
    pub sender_id: String,
}

impl ListSenderChannelsQuery {
    pub fn new(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ListSenderChannelsError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] MessageStoreError),
}

/// A sender's channels, newest activity first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderChannels {
    pub sender_id: SenderId,
    pub channels: Vec<ChannelSummary>,
}

pub struct ListSenderChannelsHandler {
    store: Arc<dyn MessageStore>,
}

impl ListSenderChannelsHandler {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: ListSenderChannelsQuery,
    ) -> Result<SenderChannels, ListSenderChannelsError> {
        let sender_id = SenderId::parse(&query.sender_id)?;
        let channels = self.store.channels_for_sender(&sender_id).await?;

        Ok(SenderChannels {
            sender_id,
            channels,
        })
    }
}
