//! Command and query handlers sitting beside the relay.

pub mod chat;
