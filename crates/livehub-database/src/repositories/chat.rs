//! Chat log repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use livehub_core::error::AppError;
use livehub_core::result::AppResult;
use livehub_entity::chat::ChatMessage;

use crate::connection::db_error;
use crate::store::ChatStore;

#[derive(Debug, Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatStore for ChatRepository {
    async fn insert_if_absent(&self, message: &ChatMessage) -> AppResult<(ChatMessage, bool)> {
        let inserted = sqlx::query_as::<_, ChatMessage>(
            "INSERT INTO chat_messages (id, session_id, message_id, sender_id, sender_name, message, timestamp) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (message_id) DO NOTHING RETURNING *",
        )
        .bind(message.id)
        .bind(message.session_id)
        .bind(&message.message_id)
        .bind(message.sender_id)
        .bind(&message.sender_name)
        .bind(&message.message)
        .bind(message.timestamp)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to save chat message"))?;

        if let Some(stored) = inserted {
            return Ok((stored, true));
        }

        sqlx::query_as::<_, ChatMessage>("SELECT * FROM chat_messages WHERE message_id = $1")
            .bind(&message.message_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to load chat message"))?
            .map(|existing| (existing, false))
            .ok_or_else(|| AppError::database("Chat message vanished after conflict"))
    }

    async fn list_by_session(&self, session_id: Uuid) -> AppResult<Vec<ChatMessage>> {
        sqlx::query_as::<_, ChatMessage>(
            "SELECT * FROM chat_messages WHERE session_id = $1 ORDER BY timestamp ASC, id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list chat messages"))
    }

    async fn delete_by_message_id(&self, message_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE message_id = $1")
            .bind(message_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete chat message"))?;
        Ok(result.rows_affected() > 0)
    }
}
