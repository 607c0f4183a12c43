//! In-memory action log.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use livehub_core::result::AppResult;
use livehub_entity::action::ActionRecord;

use crate::store::ActionStore;

#[derive(Debug, Default)]
pub struct MemoryActionStore {
    records: RwLock<Vec<ActionRecord>>,
}

impl MemoryActionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActionStore for MemoryActionStore {
    async fn append(&self, record: &ActionRecord) -> AppResult<ActionRecord> {
        self.records.write().await.push(record.clone());
        Ok(record.clone())
    }

    async fn list_by_session(&self, session_id: Uuid) -> AppResult<Vec<ActionRecord>> {
        let mut found: Vec<ActionRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect();
        // Stable sort keeps append order for equal timestamps.
        found.sort_by_key(|r| r.created_at);
        Ok(found)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }
}
