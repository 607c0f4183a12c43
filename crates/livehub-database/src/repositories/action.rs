//! Live action log repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use livehub_core::result::AppResult;
use livehub_entity::action::ActionRecord;

use crate::connection::db_error;
use crate::store::ActionStore;

#[derive(Debug, Clone)]
pub struct ActionRepository {
    pool: PgPool,
}

impl ActionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActionStore for ActionRepository {
    async fn append(&self, record: &ActionRecord) -> AppResult<ActionRecord> {
        sqlx::query_as::<_, ActionRecord>(
            "INSERT INTO live_actions (id, session_id, action_type, payload, created_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(record.id)
        .bind(record.session_id)
        .bind(&record.action_type)
        .bind(&record.payload)
        .bind(record.created_by)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to save action"))
    }

    async fn list_by_session(&self, session_id: Uuid) -> AppResult<Vec<ActionRecord>> {
        sqlx::query_as::<_, ActionRecord>(
            "SELECT * FROM live_actions WHERE session_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list actions"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM live_actions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete action"))?;
        Ok(result.rows_affected() > 0)
    }
}
