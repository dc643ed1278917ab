//! Chat domain: messages exchanged inside channels.

mod message;
mod summary;

pub use message::{ChatMessage, PublishRequest, ValidatedPublish};
pub use summary::{sort_by_recent_activity, ChannelSummary};
