//! Chat log.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use livehub_core::error::AppError;
use livehub_database::store::{ChatStore, SessionStore};
use livehub_entity::chat::{ChatMessage, CreateChatMessage};

use crate::context::RequestContext;

/// Result of saving a chat message.
#[derive(Debug, Clone, Serialize)]
pub struct SavedChat {
    #[serde(flatten)]
    pub message: ChatMessage,
    /// The `message_id` was already stored; nothing was written.
    pub duplicate: bool,
}

#[derive(Debug, Clone)]
pub struct ChatService {
    sessions: Arc<dyn SessionStore>,
    chat: Arc<dyn ChatStore>,
}

impl ChatService {
    pub fn new(sessions: Arc<dyn SessionStore>, chat: Arc<dyn ChatStore>) -> Self {
        Self { sessions, chat }
    }

    /// Store a message. Re-submitting a stored `message_id` to the same
    /// session returns the stored message unchanged; reusing it for a
    /// different session is a conflict.
    pub async fn save(
        &self,
        ctx: &RequestContext,
        data: CreateChatMessage,
    ) -> Result<SavedChat, AppError> {
        for (field, value) in [
            ("message_id", &data.message_id),
            ("sender_name", &data.sender_name),
            ("message", &data.message),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{field} is required")));
            }
        }

        if self.sessions.find_by_id(data.session_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Session {} not found",
                data.session_id
            )));
        }

        let message = CreateChatMessage {
            sender_id: ctx.user_id(),
            ..data
        }
        .into_message(Utc::now());

        let (stored, inserted) = self.chat.insert_if_absent(&message).await?;
        if !inserted && stored.session_id != message.session_id {
            return Err(AppError::conflict(format!(
                "message_id {} is already used by another session",
                message.message_id
            )));
        }
        if inserted {
            debug!(session_id = %stored.session_id, message_id = %stored.message_id, "Chat message saved");
        } else {
            debug!(message_id = %stored.message_id, "Duplicate chat message ignored");
        }

        Ok(SavedChat {
            message: stored,
            duplicate: !inserted,
        })
    }

    /// Messages of a session, oldest first.
    pub async fn list(&self, session_id: Uuid) -> Result<Vec<ChatMessage>, AppError> {
        self.chat.list_by_session(session_id).await
    }

    pub async fn delete(&self, ctx: &RequestContext, message_id: &str) -> Result<(), AppError> {
        let actor = ctx.require_elevated()?;
        if !self.chat.delete_by_message_id(message_id).await? {
            return Err(AppError::not_found(format!(
                "Chat message {message_id} not found"
            )));
        }
        info!(message_id = %message_id, actor = %actor.user_id, "Chat message deleted");
        Ok(())
    }
}
