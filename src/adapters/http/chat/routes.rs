//! Axum routes for chat endpoints.

use axum::routing::get;
use axum::Router;

use super::handlers::{get_history, health, list_sender_channels, publish_message, ChatAppState};

/// Creates routes for chat endpoints.
///
/// REST Endpoints:
/// - GET /channels/:channel_id/messages - Recent channel history
/// - POST /channels/:channel_id/messages - Publish a message over HTTP
/// - GET /senders/:sender_id/channels - Channels a sender has posted in
pub fn chat_routes() -> Router<ChatAppState> {
    Router::new()
        .route(
            "/channels/:channel_id/messages",
            get(get_history).post(publish_message),
        )
        .route("/senders/:sender_id/channels", get(list_sender_channels))
}

/// Combined router with chat routes under /api plus /health.
pub fn chat_router() -> Router<ChatAppState> {
    Router::new()
        .nest("/api", chat_routes())
        .route("/health", get(health))
}
