//! Request and response DTOs for chat endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::chat::{ChannelSummary, ChatMessage};

/// Query parameters for history requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
}

/// Body of `POST /api/channels/:channel_id/messages`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PublishMessageRequest {
    pub sender: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: String,
    pub channel_id: String,
    pub sender: String,
    pub content: String,
    pub sent_at: String,
}

impl From<ChatMessage> for MessageView {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id.to_string(),
            channel_id: message.channel_id.to_string(),
            sender: message.sender_id.to_string(),
            content: message.content,
            sent_at: message.sent_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub channel_id: String,
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishMessageResponse {
    pub message: MessageView,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub channels: usize,
    pub connections: usize,
}

/// One entry of a sender's conversation list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummaryView {
    pub channel_id: String,
    pub last_message: MessageView,
}

impl From<ChannelSummary> for ChannelSummaryView {
    fn from(summary: ChannelSummary) -> Self {
        Self {
            channel_id: summary.channel_id.to_string(),
            last_message: MessageView::from(summary.latest),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderChannelsResponse {
    pub sender_id: String,
    pub channels: Vec<ChannelSummaryView>,
}

/// Standard error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
