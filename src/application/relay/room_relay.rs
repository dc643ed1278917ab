//! The room relay: channel membership plus message fan-out.
//!
//! ```text
//!             publish(room1)
//!                  │
//!                  ▼
//! ┌────────────────────────────────────┐       ┌──────────────┐
//! │ RoomRelay                          │──────►│ MessageStore │
//! │  membership: room1 → {a, b, c}     │ store └──────────────┘
//! │  outboxes:   a → tx, b → tx, ...   │
//! └────────────────────────────────────┘
//!        │ try_send        │ try_send
//!        ▼                 ▼
//!     outbox b          outbox c
//! ```
//!
//! Membership mutations and fan-out run under one lock, so every subscriber
//! sees publishes in relay-call order and a completed leave is never
//! followed by a delivery. Fan-out never awaits while holding the lock:
//! outboxes are bounded and a full or closed outbox marks its connection as
//! gone. Persistence happens after fan-out, outside the lock.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;

use crate::config::{EchoPolicy, RelayConfig};
use crate::domain::chat::{ChatMessage, PublishRequest};
use crate::domain::foundation::{ChannelId, ConnectionId};
use crate::ports::MessageStore;

use super::membership::MembershipTable;
use super::{RelayError, RelayEvent};

/// Where a publish came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A live relay connection; failures are reported to it as error events.
    Connection(ConnectionId),
    /// A caller outside the relay (HTTP); failures are only returned.
    External,
}

#[derive(Default)]
struct RelayState {
    outboxes: HashMap<ConnectionId, mpsc::Sender<RelayEvent>>,
    membership: MembershipTable,
}

impl RelayState {
    /// Removes the outbox and every membership of `connection`.
    fn drop_connection(&mut self, connection: &ConnectionId) -> bool {
        let had_outbox = self.outboxes.remove(connection).is_some();
        let channels = self.membership.remove_connection(connection);
        had_outbox || !channels.is_empty()
    }

    /// Queues `event` for `connection`, dropping the connection if its
    /// outbox is closed or full.
    fn send_or_drop(&mut self, connection: &ConnectionId, event: RelayEvent) -> bool {
        let Some(outbox) = self.outboxes.get(connection) else {
            return false;
        };
        match outbox.try_send(event) {
            Ok(()) => true,
            Err(err) => {
                log_unreachable(connection, &err);
                self.drop_connection(connection);
                false
            }
        }
    }
}

fn log_unreachable(connection: &ConnectionId, err: &TrySendError<RelayEvent>) {
    match err {
        TrySendError::Full(_) => tracing::warn!(
            connection_id = %connection,
            "Outbox full, dropping slow connection"
        ),
        TrySendError::Closed(_) => tracing::debug!(
            connection_id = %connection,
            "Outbox closed, dropping connection"
        ),
    }
}

/// Fan-out relay for named channels.
///
/// Constructed once per process and shared as `Arc<RoomRelay>`.
pub struct RoomRelay {
    state: Mutex<RelayState>,
    store: Arc<dyn MessageStore>,
    config: RelayConfig,
}

impl RoomRelay {
    pub fn new(store: Arc<dyn MessageStore>, config: RelayConfig) -> Self {
        Self {
            state: Mutex::new(RelayState::default()),
            store,
            config,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Registers a new connection.
    ///
    /// Every event for the connection arrives on the returned receiver, in
    /// the order the relay produced it. Dropping the receiver is treated as
    /// a disconnect on the next delivery attempt.
    pub async fn connect(&self) -> (ConnectionId, mpsc::Receiver<RelayEvent>) {
        let (tx, rx) = mpsc::channel(self.config.outbound_buffer);
        let connection_id = ConnectionId::new();

        self.state.lock().await.outboxes.insert(connection_id, tx);
        tracing::debug!(connection_id = %connection_id, "Connection registered");

        (connection_id, rx)
    }

    /// Unregisters a connection and drops all of its memberships.
    ///
    /// Safe to call more than once.
    pub async fn disconnect(&self, connection: &ConnectionId) {
        let removed = self.state.lock().await.drop_connection(connection);
        if removed {
            tracing::debug!(connection_id = %connection, "Connection unregistered");
        }
    }

    /// Subscribes `connection` to `channel_id`.
    ///
    /// Idempotent; the connection receives a `Joined` acknowledgement each
    /// time. An invalid channel id is reported to the connection. If the
    /// acknowledgement cannot be queued the connection is dropped and
    /// `ConnectionGone` is returned.
    pub async fn join(
        &self,
        connection: &ConnectionId,
        channel_id: &str,
    ) -> Result<ChannelId, RelayError> {
        let mut state = self.state.lock().await;
        if !state.outboxes.contains_key(connection) {
            return Err(RelayError::ConnectionGone(*connection));
        }

        let channel = match ChannelId::parse(channel_id) {
            Ok(channel) => channel,
            Err(err) => {
                let err = RelayError::from(err);
                state.send_or_drop(connection, RelayEvent::from(&err));
                return Err(err);
            }
        };

        if state.membership.join(*connection, channel.clone()) {
            tracing::debug!(
                connection_id = %connection,
                channel_id = %channel,
                "Joined channel"
            );
        }
        let acked = state.send_or_drop(
            connection,
            RelayEvent::Joined {
                channel_id: channel.clone(),
            },
        );
        if !acked {
            return Err(RelayError::ConnectionGone(*connection));
        }

        Ok(channel)
    }

    /// Unsubscribes `connection` from `channel_id`.
    ///
    /// Returns whether a membership was removed; leaving a channel the
    /// connection is not in is a no-op.
    pub async fn leave(
        &self,
        connection: &ConnectionId,
        channel_id: &str,
    ) -> Result<bool, RelayError> {
        let mut state = self.state.lock().await;
        if !state.outboxes.contains_key(connection) {
            return Err(RelayError::ConnectionGone(*connection));
        }

        let channel = match ChannelId::parse(channel_id) {
            Ok(channel) => channel,
            Err(err) => {
                let err = RelayError::from(err);
                state.send_or_drop(connection, RelayEvent::from(&err));
                return Err(err);
            }
        };

        let removed = state.membership.leave(connection, &channel);
        if removed {
            tracing::debug!(
                connection_id = %connection,
                channel_id = %channel,
                "Left channel"
            );
            if !state.send_or_drop(connection, RelayEvent::Left { channel_id: channel }) {
                return Err(RelayError::ConnectionGone(*connection));
            }
        }

        Ok(removed)
    }

    /// Publishes a message into a channel.
    ///
    /// Delivers to every current member (the origin only under
    /// [`EchoPolicy::IncludeSender`]), then stores the message. A storage
    /// failure does not undo delivery; it is reported to the origin once
    /// and returned.
    pub async fn publish(
        &self,
        origin: Origin,
        request: PublishRequest,
    ) -> Result<ChatMessage, RelayError> {
        let validated = match request.validate(self.config.max_content_length) {
            Ok(validated) => validated,
            Err(err) => {
                let err = RelayError::from(err);
                tracing::debug!(origin = ?origin, error = %err, "Rejected publish");
                self.report(&origin, &err).await;
                return Err(err);
            }
        };

        let message = validated.into_message();
        let delivered = self.fan_out(&origin, &message).await;
        tracing::debug!(
            channel_id = %message.channel_id,
            message_id = %message.id,
            delivered,
            "Message relayed"
        );

        match self.store.store(&message).await {
            Ok(stored) => Ok(stored),
            Err(err) => {
                tracing::warn!(
                    channel_id = %message.channel_id,
                    message_id = %message.id,
                    error = %err,
                    "Failed to persist relayed message"
                );
                let err = RelayError::from(err);
                self.report(&origin, &err).await;
                Err(err)
            }
        }
    }

    /// Sends a direct reply to one connection.
    pub async fn notify(
        &self,
        connection: &ConnectionId,
        event: RelayEvent,
    ) -> Result<(), RelayError> {
        let mut state = self.state.lock().await;
        if state.send_or_drop(connection, event) {
            Ok(())
        } else {
            Err(RelayError::ConnectionGone(*connection))
        }
    }

    /// Number of channels with at least one member.
    pub async fn channel_count(&self) -> usize {
        self.state.lock().await.membership.channel_count()
    }

    /// Number of members of a channel (0 if it does not exist).
    pub async fn member_count(&self, channel: &ChannelId) -> usize {
        self.state.lock().await.membership.member_count(channel)
    }

    /// Number of registered connections.
    pub async fn connection_count(&self) -> usize {
        self.state.lock().await.outboxes.len()
    }

    pub async fn is_connected(&self, connection: &ConnectionId) -> bool {
        self.state.lock().await.outboxes.contains_key(connection)
    }

    /// Channels a connection is subscribed to, sorted by name.
    pub async fn channels_of(&self, connection: &ConnectionId) -> Vec<ChannelId> {
        self.state.lock().await.membership.channels_of(connection)
    }

    async fn fan_out(&self, origin: &Origin, message: &ChatMessage) -> usize {
        let skip = match (origin, self.config.echo_policy) {
            (Origin::Connection(id), EchoPolicy::ExcludeSender) => Some(*id),
            _ => None,
        };

        let mut state = self.state.lock().await;
        let targets: Vec<ConnectionId> = state
            .membership
            .members(&message.channel_id)
            .filter(|member| Some(**member) != skip)
            .copied()
            .collect();

        let mut delivered = 0;
        let mut gone = Vec::new();
        for target in targets {
            match state.outboxes.get(&target) {
                Some(outbox) => match outbox.try_send(RelayEvent::Delivered(message.clone())) {
                    Ok(()) => delivered += 1,
                    Err(err) => {
                        log_unreachable(&target, &err);
                        gone.push(target);
                    }
                },
                None => gone.push(target),
            }
        }

        for connection in &gone {
            state.drop_connection(connection);
        }

        delivered
    }

    async fn report(&self, origin: &Origin, err: &RelayError) {
        if let Origin::Connection(connection) = origin {
            self.state
                .lock()
                .await
                .send_or_drop(connection, RelayEvent::from(err));
        }
    }
}
