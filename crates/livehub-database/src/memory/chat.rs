//! In-memory chat log.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use livehub_core::result::AppResult;
use livehub_entity::chat::ChatMessage;

use crate::store::ChatStore;

#[derive(Debug, Default)]
pub struct MemoryChatStore {
    messages: RwLock<Vec<ChatMessage>>,
}

impl MemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatStore for MemoryChatStore {
    async fn insert_if_absent(&self, message: &ChatMessage) -> AppResult<(ChatMessage, bool)> {
        let mut messages = self.messages.write().await;
        if let Some(existing) = messages
            .iter()
            .find(|m| m.message_id == message.message_id)
        {
            return Ok((existing.clone(), false));
        }
        messages.push(message.clone());
        Ok((message.clone(), true))
    }

    async fn list_by_session(&self, session_id: Uuid) -> AppResult<Vec<ChatMessage>> {
        let mut found: Vec<ChatMessage> = self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect();
        found.sort_by_key(|m| m.timestamp);
        Ok(found)
    }

    async fn delete_by_message_id(&self, message_id: &str) -> AppResult<bool> {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|m| m.message_id != message_id);
        Ok(messages.len() != before)
    }
}
