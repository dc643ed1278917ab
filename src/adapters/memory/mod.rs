//! In-memory adapters for development and tests.

mod message_store;

pub use message_store::InMemoryMessageStore;
