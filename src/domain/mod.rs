//! Domain layer - value objects and message records.

pub mod chat;
pub mod foundation;
