//! Integration tests for the HTTP surface.
//!
//! Requests go through the fully assembled router, so routing, extractors,
//! status codes and JSON shapes are all covered together.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use async_trait::async_trait;
use gigchat::adapters::http::{build_router, AppState};
use gigchat::adapters::InMemoryMessageStore;
use gigchat::application::relay::{RelayEvent, RoomRelay};
use gigchat::config::{RelayConfig, ServerConfig};
use gigchat::domain::chat::{ChannelSummary, ChatMessage};
use gigchat::domain::foundation::{ChannelId, SenderId};
use gigchat::ports::{MessageStore, MessageStoreError};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Store that accepts writes but fails every read.
struct UnreadableStore;

#[async_trait]
impl MessageStore for UnreadableStore {
    async fn store(&self, message: &ChatMessage) -> Result<ChatMessage, MessageStoreError> {
        Ok(message.clone())
    }

    async fn history(
        &self,
        _channel_id: &ChannelId,
        _limit: usize,
    ) -> Result<Vec<ChatMessage>, MessageStoreError> {
        Err(MessageStoreError::Database("replica offline".to_string()))
    }

    async fn channels_for_sender(
        &self,
        _sender: &SenderId,
    ) -> Result<Vec<ChannelSummary>, MessageStoreError> {
        Err(MessageStoreError::Database("replica offline".to_string()))
    }
}

fn app_state() -> AppState {
    AppState::new(Arc::new(InMemoryMessageStore::new()), RelayConfig::default())
}

fn router(state: &AppState) -> Router {
    build_router(state.clone(), &ServerConfig::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_message(channel: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/channels/{channel}/messages"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn publish(state: &AppState, channel: &str, content: &str) {
    publish_as(state, channel, "alice", content).await;
}

async fn publish_as(state: &AppState, channel: &str, sender: &str, content: &str) {
    let (status, _) = send(
        router(state),
        post_message(channel, json!({ "sender": sender, "content": content })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

// =============================================================================
// POST /api/channels/:channel_id/messages
// =============================================================================

#[tokio::test]
async fn post_message_returns_created_message() {
    let state = app_state();

    let (status, body) = send(
        router(&state),
        post_message("room1", json!({ "sender": "alice", "content": "hello" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"]["channelId"], "room1");
    assert_eq!(body["message"]["sender"], "alice");
    assert_eq!(body["message"]["content"], "hello");
    assert!(body["message"]["id"].is_string());
    assert!(body["message"]["sentAt"].is_string());
}

#[tokio::test]
async fn post_message_without_content_is_rejected() {
    let state = app_state();

    let (status, body) = send(
        router(&state),
        post_message("room1", json!({ "sender": "alice" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn post_message_without_sender_is_rejected() {
    let state = app_state();

    let (status, body) = send(
        router(&state),
        post_message("room1", json!({ "content": "hello" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn post_message_is_relayed_to_live_members() {
    let state = app_state();
    let relay: &RoomRelay = &state.relay;
    let (member, mut rx) = relay.connect().await;
    relay.join(&member, "room1").await.unwrap();
    assert!(matches!(rx.recv().await, Some(RelayEvent::Joined { .. })));

    publish(&state, "room1", "over http").await;

    match rx.recv().await {
        Some(RelayEvent::Delivered(message)) => assert_eq!(message.content, "over http"),
        other => panic!("expected delivery, got {other:?}"),
    }
}

// =============================================================================
// GET /api/channels/:channel_id/messages
// =============================================================================

#[tokio::test]
async fn history_returns_messages_oldest_first() {
    let state = app_state();
    for content in ["one", "two", "three"] {
        publish(&state, "room1", content).await;
    }

    let (status, body) = send(router(&state), get("/api/channels/room1/messages")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["channelId"], "room1");
    let contents: Vec<&str> = body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn history_limit_keeps_most_recent() {
    let state = app_state();
    for content in ["one", "two", "three"] {
        publish(&state, "room1", content).await;
    }

    let (status, body) = send(router(&state), get("/api/channels/room1/messages?limit=2")).await;

    assert_eq!(status, StatusCode::OK);
    let contents: Vec<&str> = body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["two", "three"]);
}

#[tokio::test]
async fn history_of_unknown_channel_is_empty() {
    let state = app_state();

    let (status, body) = send(router(&state), get("/api/channels/nowhere/messages")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"], json!([]));
}

#[tokio::test]
async fn history_is_scoped_to_channel() {
    let state = app_state();
    publish(&state, "room1", "for room1").await;
    publish(&state, "room2", "for room2").await;

    let (_, body) = send(router(&state), get("/api/channels/room2/messages")).await;

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "for room2");
}

#[tokio::test]
async fn history_store_failure_is_internal_error() {
    let state = AppState::new(Arc::new(UnreadableStore), RelayConfig::default());

    let (status, body) = send(router(&state), get("/api/channels/room1/messages")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_ERROR");
}

// =============================================================================
// GET /api/senders/:sender_id/channels
// =============================================================================

#[tokio::test]
async fn sender_channels_lists_latest_message_per_channel() {
    let state = app_state();
    publish_as(&state, "gig-1", "alice", "quote sent").await;
    publish_as(&state, "gig-2", "alice", "still free?").await;
    publish_as(&state, "gig-1", "bob", "looks good").await;
    publish_as(&state, "gig-3", "bob", "not for alice").await;

    let (status, body) = send(router(&state), get("/api/senders/alice/channels")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["senderId"], "alice");
    let listed: Vec<(&str, &str)> = body["channels"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["channelId"].as_str().unwrap(),
                c["lastMessage"]["content"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(listed.len(), 2);
    assert!(listed.contains(&("gig-1", "looks good")));
    assert!(listed.contains(&("gig-2", "still free?")));
}

#[tokio::test]
async fn sender_channels_of_unknown_sender_is_empty() {
    let state = app_state();
    publish(&state, "room1", "hello").await;

    let (status, body) = send(router(&state), get("/api/senders/nobody/channels")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["channels"], json!([]));
}

#[tokio::test]
async fn sender_channels_store_failure_is_internal_error() {
    let state = AppState::new(Arc::new(UnreadableStore), RelayConfig::default());

    let (status, body) = send(router(&state), get("/api/senders/alice/channels")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn sender_channels_rejects_invalid_sender() {
    let state = app_state();

    let (status, body) = send(router(&state), get("/api/senders/%20/channels")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

// =============================================================================
// GET /health
// =============================================================================

#[tokio::test]
async fn health_reports_relay_occupancy() {
    let state = app_state();
    let (member, _rx) = state.relay.connect().await;
    state.relay.join(&member, "room1").await.unwrap();

    let (status, body) = send(router(&state), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["channels"], 1);
    assert_eq!(body["connections"], 1);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let state = app_state();

    let (status, _) = send(router(&state), get("/api/nothing")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
