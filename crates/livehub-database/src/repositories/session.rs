//! Session repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use livehub_core::result::AppResult;
use livehub_entity::session::{LiveStatus, Session};

use crate::connection::db_error;
use crate::store::SessionStore;

/// Repository for sessions and the room claim protocol.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find session"))
    }

    async fn insert(&self, session: &Session) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, event_id, title, format, stream_mode, start_date, end_date, \
             published_at, room_name, room_url, room_claimed_at, live_status, max_attendees, \
             speaker_emails, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING *",
        )
        .bind(session.id)
        .bind(session.event_id)
        .bind(&session.title)
        .bind(session.format)
        .bind(session.stream_mode)
        .bind(session.start_date)
        .bind(session.end_date)
        .bind(session.published_at)
        .bind(&session.room_name)
        .bind(&session.room_url)
        .bind(session.room_claimed_at)
        .bind(session.live_status)
        .bind(session.max_attendees)
        .bind(&session.speaker_emails)
        .bind(session.created_at)
        .bind(session.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create session"))
    }

    async fn update_content(&self, session: &Session) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "UPDATE sessions SET title = $2, format = $3, stream_mode = $4, start_date = $5, \
             end_date = $6, published_at = $7, max_attendees = $8, speaker_emails = $9, \
             updated_at = $10 WHERE id = $1 RETURNING *",
        )
        .bind(session.id)
        .bind(&session.title)
        .bind(session.format)
        .bind(session.stream_mode)
        .bind(session.start_date)
        .bind(session.end_date)
        .bind(session.published_at)
        .bind(session.max_attendees)
        .bind(&session.speaker_emails)
        .bind(session.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update session"))
    }

    async fn set_live_status(&self, id: Uuid, status: LiveStatus) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE sessions SET live_status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to set live status"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn claim_room(
        &self,
        id: Uuid,
        claim: &str,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET room_name = $2, room_url = NULL, room_claimed_at = $3 \
             WHERE id = $1 AND (room_name IS NULL OR (room_name LIKE 'claim:%' \
             AND (room_claimed_at IS NULL OR room_claimed_at < $4)))",
        )
        .bind(id)
        .bind(claim)
        .bind(now)
        .bind(stale_before)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to claim room"))?;
        Ok(result.rows_affected() == 1)
    }

    async fn set_room(
        &self,
        id: Uuid,
        claim: &str,
        room_name: &str,
        room_url: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET room_name = $3, room_url = $4, room_claimed_at = NULL, \
             updated_at = NOW() WHERE id = $1 AND room_name = $2 AND format <> 'in_person'",
        )
        .bind(id)
        .bind(claim)
        .bind(room_name)
        .bind(room_url)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to store room"))?;
        Ok(result.rows_affected() == 1)
    }

    async fn release_claim(&self, id: Uuid, claim: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET room_name = NULL, room_url = NULL, room_claimed_at = NULL \
             WHERE id = $1 AND room_name = $2",
        )
        .bind(id)
        .bind(claim)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to release room claim"))?;
        Ok(result.rows_affected() == 1)
    }

    async fn clear_room_everywhere(&self, room_name: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE sessions SET room_name = NULL, room_url = NULL, room_claimed_at = NULL, \
             updated_at = NOW() WHERE room_name = $1",
        )
        .bind(room_name)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to clear room"))?;
        Ok(result.rows_affected())
    }
}
