//! Room relay - forwards messages published into a channel to its members.
//!
//! # Components
//!
//! - [`membership`] - Channel/connection membership table
//! - [`room_relay`] - The relay object owning membership and outboxes
//! - [`events`] - Events pushed to connections
//! - [`errors`] - Relay error taxonomy

mod errors;
mod events;
pub mod membership;
pub mod room_relay;

pub use errors::RelayError;
pub use events::RelayEvent;
pub use membership::MembershipTable;
pub use room_relay::{Origin, RoomRelay};
