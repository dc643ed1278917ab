//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the relay and the outside world. Adapters implement these ports.
//!
//! - `MessageStore` - Durable chat history (the persistence collaborator)

mod message_store;

pub use message_store::{MessageStore, MessageStoreError};
