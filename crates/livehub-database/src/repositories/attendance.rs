//! Attendance log repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use livehub_core::result::AppResult;
use livehub_entity::attendance::AttendanceRecord;

use crate::connection::db_error;
use crate::store::AttendanceStore;

#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for AttendanceRepository {
    async fn insert(&self, record: &AttendanceRecord) -> AppResult<AttendanceRecord> {
        sqlx::query_as::<_, AttendanceRecord>(
            "INSERT INTO attendance_records (id, session_id, user_id, user_name, joined_at, left_at, auto_closed) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(record.id)
        .bind(record.session_id)
        .bind(record.user_id)
        .bind(&record.user_name)
        .bind(record.joined_at)
        .bind(record.left_at)
        .bind(record.auto_closed)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to record join"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>("SELECT * FROM attendance_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find attendance record"))
    }

    async fn close(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<Option<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            "UPDATE attendance_records SET left_at = COALESCE(left_at, $2) WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to record leave"))
    }

    async fn close_stale(&self, cutoff: DateTime<Utc>, at: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE attendance_records SET left_at = $2, auto_closed = TRUE \
             WHERE left_at IS NULL AND joined_at < $1",
        )
        .bind(cutoff)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to close stale attendance"))?;
        Ok(result.rows_affected())
    }
}
