//! HTTP handlers for chat endpoints.
//!
//! These handlers connect Axum routes to the relay and the history query.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::chat::{
    GetHistoryError, GetHistoryHandler, GetHistoryQuery, ListSenderChannelsError,
    ListSenderChannelsHandler, ListSenderChannelsQuery,
};
use crate::application::relay::{Origin, RelayError, RoomRelay};
use crate::domain::chat::PublishRequest;
use crate::domain::foundation::ErrorCode;

use super::dto::{
    ChannelSummaryView, ErrorResponse, HealthResponse, HistoryParams, HistoryResponse,
    MessageView, PublishMessageRequest, PublishMessageResponse, SenderChannelsResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for chat handlers.
#[derive(Clone)]
pub struct ChatAppState {
    pub relay: Arc<RoomRelay>,
    pub history: Arc<GetHistoryHandler>,
    pub sender_channels: Arc<ListSenderChannelsHandler>,
}

impl ChatAppState {
    pub fn new(
        relay: Arc<RoomRelay>,
        history: Arc<GetHistoryHandler>,
        sender_channels: Arc<ListSenderChannelsHandler>,
    ) -> Self {
        Self {
            relay,
            history,
            sender_channels,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /api/channels/:channel_id/messages
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/channels/:channel_id/messages - Recent channel history.
///
/// # Query Parameters
/// - `limit`: Maximum messages to return (default 50, capped by config)
///
/// # Errors
/// - 400 Bad Request: Invalid channel id
pub async fn get_history(
    State(state): State<ChatAppState>,
    Path(channel_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, ChatApiError> {
    let history = state
        .history
        .handle(GetHistoryQuery::new(channel_id, params.limit))
        .await?;

    let response = HistoryResponse {
        channel_id: history.channel_id.to_string(),
        messages: history.messages.into_iter().map(MessageView::from).collect(),
    };
    Ok((StatusCode::OK, Json(response)))
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/channels/:channel_id/messages
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/channels/:channel_id/messages - Publish without a socket.
///
/// The message is relayed to the channel's live members and stored.
///
/// # Errors
/// - 400 Bad Request: Missing sender or content, or invalid channel id
/// - 503 Service Unavailable: Delivered to live members but not stored
pub async fn publish_message(
    State(state): State<ChatAppState>,
    Path(channel_id): Path<String>,
    Json(body): Json<PublishMessageRequest>,
) -> Result<impl IntoResponse, ChatApiError> {
    let request = PublishRequest::new(
        channel_id,
        body.sender.unwrap_or_default(),
        body.content.unwrap_or_default(),
    );

    let message = state.relay.publish(Origin::External, request).await?;

    let response = PublishMessageResponse {
        message: MessageView::from(message),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /api/senders/:sender_id/channels
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/senders/:sender_id/channels - A sender's conversation list.
///
/// Each entry carries the channel's latest message; most recent first.
///
/// # Errors
/// - 400 Bad Request: Invalid sender id
pub async fn list_sender_channels(
    State(state): State<ChatAppState>,
    Path(sender_id): Path<String>,
) -> Result<impl IntoResponse, ChatApiError> {
    let result = state
        .sender_channels
        .handle(ListSenderChannelsQuery::new(sender_id))
        .await?;

    let response = SenderChannelsResponse {
        sender_id: result.sender_id.to_string(),
        channels: result.channels.into_iter().map(ChannelSummaryView::from).collect(),
    };
    Ok((StatusCode::OK, Json(response)))
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /health
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health - Liveness plus relay occupancy.
pub async fn health(State(state): State<ChatAppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        channels: state.relay.channel_count().await,
        connections: state.relay.connection_count().await,
    };
    (StatusCode::OK, Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type for chat endpoints.
#[derive(Debug)]
pub enum ChatApiError {
    BadRequest(String),
    PersistenceFailed,
    Internal(String),
}

impl From<RelayError> for ChatApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Validation(e) => ChatApiError::BadRequest(e.to_string()),
            RelayError::Persistence(_) => ChatApiError::PersistenceFailed,
            RelayError::ConnectionGone(_) => ChatApiError::Internal(err.to_string()),
        }
    }
}

impl From<GetHistoryError> for ChatApiError {
    fn from(err: GetHistoryError) -> Self {
        match err {
            GetHistoryError::Validation(e) => ChatApiError::BadRequest(e.to_string()),
            GetHistoryError::Store(e) => ChatApiError::Internal(e.to_string()),
        }
    }
}

impl From<ListSenderChannelsError> for ChatApiError {
    fn from(err: ListSenderChannelsError) -> Self {
        match err {
            ListSenderChannelsError::Validation(e) => ChatApiError::BadRequest(e.to_string()),
            ListSenderChannelsError::Store(e) => ChatApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ChatApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::ValidationFailed.as_str(), msg),
            ),
            ChatApiError::PersistenceFailed => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new(
                    ErrorCode::PersistenceFailed.as_str(),
                    "Message was delivered but could not be saved",
                ),
            ),
            ChatApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(ErrorCode::InternalError.as_str(), "An internal error occurred"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}
