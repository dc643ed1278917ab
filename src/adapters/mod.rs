//! Adapters - Implementations of port interfaces and transports.
//!
//! Adapters connect the relay to external systems:
//! - `http` - REST endpoints and router assembly
//! - `websocket` - JSON WebSocket transport for relay connections
//! - `postgres` - PostgreSQL message store
//! - `memory` - In-memory message store

pub mod http;
pub mod memory;
pub mod postgres;
pub mod websocket;

pub use memory::InMemoryMessageStore;
pub use postgres::PostgresMessageStore;
