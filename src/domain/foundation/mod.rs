//! Foundation value objects shared by the chat domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{ChannelId, ConnectionId, MessageId, SenderId, MAX_LABEL_LENGTH};
pub use timestamp::Timestamp;
