//! WebSocket adapter for the room relay.
//!
//! Carries the relay's events over a persistent JSON WebSocket connection.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  text frame   ┌────────────┐  join/leave/publish  ┌───────────┐
//! │   client     │──────────────►│  handler   │─────────────────────►│ RoomRelay │
//! │  (browser)   │◄──────────────│ send task  │◄─────────────────────│  outbox   │
//! └──────────────┘  ServerMessage└────────────┘      RelayEvent      └───────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`handler`] - Axum WebSocket upgrade handler and frame dispatch

pub mod handler;
pub mod messages;

pub use handler::{dispatch, ws_handler, WebSocketState};
pub use messages::{ClientMessage, ServerMessage};
