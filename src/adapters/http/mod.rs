//! HTTP adapters - REST API and router assembly.

pub mod app;
pub mod chat;

// Re-export key types for convenience
pub use app::{build_router, AppState};
pub use chat::{chat_router, ChatAppState};
