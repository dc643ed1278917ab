//! PostgreSQL implementation of MessageStore.
//!
//! Persists relayed chat messages to the `chat_messages` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::chat::{ChannelSummary, ChatMessage};
use crate::domain::foundation::{ChannelId, MessageId, SenderId, Timestamp};
use crate::ports::{MessageStore, MessageStoreError};

/// PostgreSQL implementation of MessageStore.
#[derive(Clone)]
pub struct PostgresMessageStore {
    pool: PgPool,
}

impl PostgresMessageStore {
    /// Creates a new PostgresMessageStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PostgresMessageStore {
    async fn store(&self, message: &ChatMessage) -> Result<ChatMessage, MessageStoreError> {
        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, channel_id, sender_id, content, sent_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(message.channel_id.as_str())
        .bind(message.sender_id.as_str())
        .bind(&message.content)
        .bind(message.sent_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| MessageStoreError::Database(format!("Failed to insert message: {}", e)))?;

        Ok(message.clone())
    }

    async fn history(
        &self,
        channel_id: &ChannelId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, MessageStoreError> {
        // Newest first for the LIMIT, then flipped back to chronological.
        let rows = sqlx::query(
            r#"
            SELECT id, channel_id, sender_id, content, sent_at
            FROM chat_messages
            WHERE channel_id = $1
            ORDER BY sent_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(channel_id.as_str())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MessageStoreError::Database(format!("Failed to load history: {}", e)))?;

        let mut messages = rows
            .iter()
            .map(row_to_message)
            .collect::<Result<Vec<_>, _>>()?;
        messages.reverse();
        Ok(messages)
    }

    async fn channels_for_sender(
        &self,
        sender: &SenderId,
    ) -> Result<Vec<ChannelSummary>, MessageStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, channel_id, sender_id, content, sent_at
            FROM (
                SELECT DISTINCT ON (channel_id) id, channel_id, sender_id, content, sent_at
                FROM chat_messages
                WHERE channel_id IN (
                    SELECT channel_id FROM chat_messages WHERE sender_id = $1
                )
                ORDER BY channel_id, sent_at DESC, id DESC
            ) latest
            ORDER BY sent_at DESC, channel_id
            "#,
        )
        .bind(sender.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MessageStoreError::Database(format!("Failed to list channels: {}", e)))?;

        rows.iter()
            .map(|row| row_to_message(row).map(ChannelSummary::new))
            .collect()
    }
}

fn row_to_message(row: &PgRow) -> Result<ChatMessage, MessageStoreError> {
    let id: Uuid = row.try_get("id").map_err(column_error)?;
    let channel_id: String = row.try_get("channel_id").map_err(column_error)?;
    let sender_id: String = row.try_get("sender_id").map_err(column_error)?;
    let content: String = row.try_get("content").map_err(column_error)?;
    let sent_at: DateTime<Utc> = row.try_get("sent_at").map_err(column_error)?;

    let channel_id = ChannelId::parse(&channel_id)
        .map_err(|e| MessageStoreError::Serialization(e.to_string()))?;
    let sender_id =
        SenderId::parse(&sender_id).map_err(|e| MessageStoreError::Serialization(e.to_string()))?;

    Ok(ChatMessage::reconstitute(
        MessageId::from_uuid(id),
        channel_id,
        sender_id,
        content,
        Timestamp::from_datetime(sent_at),
    ))
}

fn column_error(e: sqlx::Error) -> MessageStoreError {
    MessageStoreError::Serialization(format!("Failed to read column: {}", e))
}
