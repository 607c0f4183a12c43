//! Chat message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A chat message sent in a live room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    /// Client-generated idempotency key; unique across the log.
    pub message_id: String,
    pub sender_id: Option<Uuid>,
    pub sender_name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Data required to save a chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatMessage {
    pub session_id: Uuid,
    pub message_id: String,
    pub sender_id: Option<Uuid>,
    pub sender_name: String,
    pub message: String,
    /// Client send time; the server clock is used when absent.
    pub timestamp: Option<DateTime<Utc>>,
}

impl CreateChatMessage {
    pub fn into_message(self, now: DateTime<Utc>) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4(),
            session_id: self.session_id,
            message_id: self.message_id,
            sender_id: self.sender_id,
            sender_name: self.sender_name,
            message: self.message,
            timestamp: self.timestamp.unwrap_or(now),
        }
    }
}
