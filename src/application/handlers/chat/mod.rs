//! Chat query handlers.

mod get_history;
mod list_sender_channels;

pub use get_history::{ChannelHistory, GetHistoryError, GetHistoryHandler, GetHistoryQuery};
pub use list_sender_channels::{
    ListSenderChannelsError, ListSenderChannelsHandler, ListSenderChannelsQuery, SenderChannels,
};
