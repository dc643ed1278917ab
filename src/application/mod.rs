//! Application layer - the room relay and its query handlers.

pub mod handlers;
pub mod relay;
