//! Channel membership table.
//!
//! Two indexes kept in lockstep: channel → members for fan-out, and
//! connection → channels for O(1) cleanup on disconnect.
//!
//! ```text
//! channel: room1        channel: room2
//! ├── conn-a            ├── conn-a
//! └── conn-b            └── conn-c
//! ```
//!
//! A channel entry exists only while it has at least one member.

use std::collections::{HashMap, HashSet};

use crate::domain::foundation::{ChannelId, ConnectionId};

#[derive(Debug, Default)]
pub struct MembershipTable {
    channels: HashMap<ChannelId, HashSet<ConnectionId>>,
    connections: HashMap<ConnectionId, HashSet<ChannelId>>,
}

impl MembershipTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `connection` to `channel`.
    ///
    /// Returns `false` if it was already a member.
    pub fn join(&mut self, connection: ConnectionId, channel: ChannelId) -> bool {
        let inserted = self
            .channels
            .entry(channel.clone())
            .or_default()
            .insert(connection);
        self.connections
            .entry(connection)
            .or_default()
            .insert(channel);
        inserted
    }

    /// Unsubscribes `connection` from `channel`.
    ///
    /// Returns `false` if it was not a member. Empty channels are dropped.
    pub fn leave(&mut self, connection: &ConnectionId, channel: &ChannelId) -> bool {
        let removed = match self.channels.get_mut(channel) {
            Some(members) => {
                let removed = members.remove(connection);
                if members.is_empty() {
                    self.channels.remove(channel);
                }
                removed
            }
            None => false,
        };

        if let Some(joined) = self.connections.get_mut(connection) {
            joined.remove(channel);
            if joined.is_empty() {
                self.connections.remove(connection);
            }
        }

        removed
    }

    /// Drops every membership of `connection`.
    ///
    /// Returns the channels it was subscribed to.
    pub fn remove_connection(&mut self, connection: &ConnectionId) -> Vec<ChannelId> {
        let joined = self.connections.remove(connection).unwrap_or_default();
        for channel in &joined {
            if let Some(members) = self.channels.get_mut(channel) {
                members.remove(connection);
                if members.is_empty() {
                    self.channels.remove(channel);
                }
            }
        }
        joined.into_iter().collect()
    }

    /// Current members of `channel`.
    pub fn members(&self, channel: &ChannelId) -> impl Iterator<Item = &ConnectionId> + '_ {
        self.channels.get(channel).into_iter().flatten()
    }

    #[cfg(test)]
    fn is_member(&self, connection: &ConnectionId, channel: &ChannelId) -> bool {
        self.channels
            .get(channel)
            .is_some_and(|members| members.contains(connection))
    }

    pub fn channels_of(&self, connection: &ConnectionId) -> Vec<ChannelId> {
        let mut channels: Vec<ChannelId> = self
            .connections
            .get(connection)
            .map(|joined| joined.iter().cloned().collect())
            .unwrap_or_default();
        channels.sort();
        channels
    }

    pub fn member_count(&self, channel: &ChannelId) -> usize {
        self.channels.get(channel).map_or(0, HashSet::len)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        let forward = self.channels.iter().all(|(channel, members)| {
            !members.is_empty()
                && members.iter().all(|conn| {
                    self.connections
                        .get(conn)
                        .is_some_and(|joined| joined.contains(channel))
                })
        });
        let backward = self.connections.iter().all(|(conn, joined)| {
            !joined.is_empty()
                && joined.iter().all(|channel| {
                    self.channels
                        .get(channel)
                        .is_some_and(|members| members.contains(conn))
                })
        });
        forward && backward
    }
}
