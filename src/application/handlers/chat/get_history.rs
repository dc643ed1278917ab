//! GetHistory query handler.
//!
//! Fetches a channel's recent messages. History is never replayed on join;
//! clients ask for it explicitly, over the socket or over HTTP.

use std::sync::Arc;

use thiserror::Error;

use crate::config::RelayConfig;
use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{ChannelId, ValidationError};
use crate::ports::{MessageStore, MessageStoreError};

/// Query for a channel's recent history.
#[derive(Debug, Clone)]
pub struct GetHistoryQuery {
    /// Raw channel id as supplied by the client.
    pub channel_id: String,
    /// Requested page size; `None` uses the configured default.
    pub limit: Option<usize>,
}

impl GetHistoryQuery {
    pub fn new(channel_id: impl Into<String>, limit: Option<usize>) -> Self {
        Self {
            channel_id: channel_id.into(),
            limit,
        }
    }
}

/// Errors that can occur when fetching history.
#[derive(Debug, Clone, Error)]
pub enum GetHistoryError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] MessageStoreError),
}

/// A page of channel history, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHistory {
    pub channel_id: ChannelId,
    pub messages: Vec<ChatMessage>,
}

/// Handler for history queries.
pub struct GetHistoryHandler {
    store: Arc<dyn MessageStore>,
    config: RelayConfig,
}

impl GetHistoryHandler {
    pub fn new(store: Arc<dyn MessageStore>, config: RelayConfig) -> Self {
        Self { store, config }
    }

    pub async fn handle(&self, query: GetHistoryQuery) -> Result<ChannelHistory, GetHistoryError> {
        let channel_id = ChannelId::parse(&query.channel_id)?;
        let limit = self.config.history_limit(query.limit);

        let messages = self.store.history(&channel_id, limit).await?;

        Ok(ChannelHistory {
            channel_id,
            messages,
        })
    }
}
