//! WebSocket upgrade handler for chat connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Register with the relay and announce the connection id
//! 2. Forward relay events from the connection's outbox to the socket
//! 3. Dispatch client messages (join, leave, publish, history, ping)
//! 4. Unregister from the relay on disconnect

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};

use crate::application::handlers::chat::{GetHistoryError, GetHistoryHandler, GetHistoryQuery};
use crate::application::relay::{Origin, RelayError, RelayEvent, RoomRelay};
use crate::domain::foundation::{ConnectionId, ErrorCode};

use super::messages::{ClientMessage, ServerMessage};

/// State required for WebSocket handling.
///
/// Extracted from the application state.
#[derive(Clone)]
pub struct WebSocketState {
    pub relay: Arc<RoomRelay>,
    pub history: Arc<GetHistoryHandler>,
}

impl WebSocketState {
    /// Create a new WebSocket state.
    pub fn new(relay: Arc<RoomRelay>, history: Arc<GetHistoryHandler>) -> Self {
        Self { relay, history }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WebSocketState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection.
///
/// Runs for the lifetime of the connection. Whichever half finishes first
/// (client closed, or the relay dropped the outbox) tears down the other.
async fn handle_socket(socket: WebSocket, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();

    let (connection_id, mut outbox) = state.relay.connect().await;

    if let Err(e) = send_message(&mut sender, &ServerMessage::connected(&connection_id)).await {
        tracing::debug!(connection_id = %connection_id, "Failed to send connected message: {}", e);
        state.relay.disconnect(&connection_id).await;
        return;
    }

    // Forward relay events to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = outbox.recv().await {
            let msg = ServerMessage::from(event);
            if let Err(e) = send_message(&mut sender, &msg).await {
                tracing::debug!(
                    connection_id = %connection_id,
                    "Send error, closing connection: {}",
                    e
                );
                break;
            }
        }
    });

    // Handle incoming messages from client
    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    dispatch(&recv_state, connection_id, &text).await;
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(
                        connection_id = %connection_id,
                        "Received unsupported binary message"
                    );
                    reply(
                        &recv_state.relay,
                        &connection_id,
                        RelayEvent::error(ErrorCode::MalformedMessage, "Binary frames are not supported"),
                    )
                    .await;
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // WebSocket protocol ping/pong - handled automatically by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!(connection_id = %connection_id, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, "Receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.relay.disconnect(&connection_id).await;
}

/// Parse and execute one text frame from a client.
///
/// Relay operations report their own failures to the connection; this
/// function only adds replies for parse errors and history lookups.
pub async fn dispatch(state: &WebSocketState, connection_id: ConnectionId, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(connection_id = %connection_id, "Malformed client message: {}", e);
            reply(
                &state.relay,
                &connection_id,
                RelayEvent::error(ErrorCode::MalformedMessage, "Message is not a recognised event"),
            )
            .await;
            return;
        }
    };

    let result = match message {
        ClientMessage::Join(request) => state
            .relay
            .join(&connection_id, request.channel_id())
            .await
            .map(drop),
        ClientMessage::Leave(request) => state
            .relay
            .leave(&connection_id, request.channel_id())
            .await
            .map(drop),
        ClientMessage::Publish(payload) => state
            .relay
            .publish(Origin::Connection(connection_id), payload.into())
            .await
            .map(drop),
        ClientMessage::History(request) => {
            let query = GetHistoryQuery::new(request.channel_id.unwrap_or_default(), request.limit);
            let event = match state.history.handle(query).await {
                Ok(history) => RelayEvent::History {
                    channel_id: history.channel_id,
                    messages: history.messages,
                },
                Err(GetHistoryError::Validation(e)) => {
                    RelayEvent::error(ErrorCode::ValidationFailed, e.to_string())
                }
                Err(GetHistoryError::Store(e)) => {
                    tracing::warn!(connection_id = %connection_id, error = %e, "History lookup failed");
                    RelayEvent::error(ErrorCode::InternalError, "Could not load history")
                }
            };
            state.relay.notify(&connection_id, event).await
        }
        ClientMessage::Ping => state.relay.notify(&connection_id, RelayEvent::Pong).await,
    };

    if let Err(err) = result {
        tracing::debug!(connection_id = %connection_id, error = %err, "Client request failed");
    }
}

async fn reply(relay: &RoomRelay, connection_id: &ConnectionId, event: RelayEvent) {
    if let Err(RelayError::ConnectionGone(_)) = relay.notify(connection_id, event).await {
        tracing::debug!(connection_id = %connection_id, "Reply dropped, connection gone");
    }
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    sender.send(Message::Text(json)).await
}
