//! Gigchat - real-time chat relay for the student freelance marketplace
//!
//! Clients join named channels (one per business/student conversation) and
//! every message published into a channel is relayed to the other members
//! and stored for later history requests.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
