//! Per-channel activity as seen by one participant.

use crate::domain::foundation::ChannelId;

use super::ChatMessage;

/// A channel a sender has posted in, with the newest message in it.
///
/// `latest` may come from any participant, not only the sender the summary
/// was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummary {
    pub channel_id: ChannelId,
    pub latest: ChatMessage,
}

impl ChannelSummary {
    pub fn new(latest: ChatMessage) -> Self {
        Self {
            channel_id: latest.channel_id.clone(),
            latest,
        }
    }
}

/// Orders summaries most recently active first.
pub fn sort_by_recent_activity(summaries: &mut [ChannelSummary]) {
    summaries.sort_by(|a, b| {
        b.latest
            .sent_at
            .cmp(&a.latest.sent_at)
            .then_with(|| a.channel_id.cmp(&b.channel_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{MessageId, SenderId, Timestamp};
    use chrono::{TimeZone, Utc};

    fn summary(channel: &str, minute: u32) -> ChannelSummary {
        ChannelSummary::new(ChatMessage::reconstitute(
            MessageId::new(),
            ChannelId::parse(channel).unwrap(),
            SenderId::parse("alice").unwrap(),
            format!("{channel} at {minute}"),
            Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 3, 1, 12, minute, 0).unwrap()),
        ))
    }

    #[test]
    fn newest_activity_comes_first() {
        let mut summaries = vec![summary("old", 1), summary("new", 30), summary("mid", 10)];

        sort_by_recent_activity(&mut summaries);

        let order: Vec<&str> = summaries.iter().map(|s| s.channel_id.as_str()).collect();
        assert_eq!(order, vec!["new", "mid", "old"]);
    }

    #[test]
    fn ties_fall_back_to_channel_name() {
        let mut summaries = vec![summary("b", 5), summary("a", 5)];

        sort_by_recent_activity(&mut summaries);

        assert_eq!(summaries[0].channel_id.as_str(), "a");
    }
}
