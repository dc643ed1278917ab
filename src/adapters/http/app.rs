//! Application router assembly.
//!
//! Wires the relay, the history handler and the HTTP/WebSocket adapters into
//! one axum router with tracing, CORS and timeout layers.

use std::sync::Arc;

use axum::extract::FromRef;
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::{ws_handler, WebSocketState};
use crate::application::handlers::chat::{GetHistoryHandler, ListSenderChannelsHandler};
use crate::application::relay::RoomRelay;
use crate::config::{RelayConfig, ServerConfig};
use crate::ports::MessageStore;

use super::chat::{chat_router, ChatAppState};

/// Root state shared by every route.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RoomRelay>,
    pub history: Arc<GetHistoryHandler>,
    pub sender_channels: Arc<ListSenderChannelsHandler>,
}

impl AppState {
    /// Builds the relay and query handlers over one message store.
    pub fn new(store: Arc<dyn MessageStore>, relay_config: RelayConfig) -> Self {
        Self {
            relay: Arc::new(RoomRelay::new(store.clone(), relay_config.clone())),
            history: Arc::new(GetHistoryHandler::new(store.clone(), relay_config)),
            sender_channels: Arc::new(ListSenderChannelsHandler::new(store)),
        }
    }
}

impl FromRef<AppState> for ChatAppState {
    fn from_ref(state: &AppState) -> Self {
        ChatAppState::new(
            state.relay.clone(),
            state.history.clone(),
            state.sender_channels.clone(),
        )
    }
}

impl FromRef<AppState> for WebSocketState {
    fn from_ref(state: &AppState) -> Self {
        WebSocketState::new(state.relay.clone(), state.history.clone())
    }
}

/// Builds the full application router.
///
/// Routes:
/// - GET /ws - WebSocket relay connection
/// - GET|POST /api/channels/:channel_id/messages
/// - GET /api/senders/:sender_id/channels
/// - GET /health
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let ws_routes: Router<AppState> = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(WebSocketState::from_ref(&state));

    let chat_routes: Router<AppState> = chat_router().with_state(ChatAppState::from_ref(&state));

    // The timeout covers the HTTP API only; upgraded sockets live on.
    let api = chat_routes.layer(TimeoutLayer::new(server.request_timeout()));

    Router::new()
        .merge(ws_routes)
        .merge(api)
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins).allow_credentials(true)
    }
}
