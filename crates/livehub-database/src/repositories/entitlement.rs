//! Entitlement repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use livehub_core::error::AppError;
use livehub_core::result::AppResult;
use livehub_entity::entitlement::Entitlement;

use crate::connection::db_error;
use crate::store::EntitlementStore;

#[derive(Debug, Clone)]
pub struct EntitlementRepository {
    pool: PgPool,
}

impl EntitlementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitlementStore for EntitlementRepository {
    async fn find_for_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        event_id: Option<Uuid>,
    ) -> AppResult<Option<Entitlement>> {
        sqlx::query_as::<_, Entitlement>(
            "SELECT * FROM entitlements WHERE user_id = $1 AND session_id = $2 \
             AND ($3::uuid IS NULL OR event_id = $3) ORDER BY granted_at ASC LIMIT 1",
        )
        .bind(user_id)
        .bind(session_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find session entitlement"))
    }

    async fn find_event_wide(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> AppResult<Option<Entitlement>> {
        sqlx::query_as::<_, Entitlement>(
            "SELECT * FROM entitlements WHERE user_id = $1 AND event_id = $2 AND session_id IS NULL",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find event entitlement"))
    }

    async fn insert_if_absent(&self, entitlement: &Entitlement) -> AppResult<(Entitlement, bool)> {
        let inserted = sqlx::query_as::<_, Entitlement>(
            "INSERT INTO entitlements (id, user_id, event_id, session_id, source, ticket_id, granted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT ON CONSTRAINT entitlements_scope_key DO NOTHING RETURNING *",
        )
        .bind(entitlement.id)
        .bind(entitlement.user_id)
        .bind(entitlement.event_id)
        .bind(entitlement.session_id)
        .bind(entitlement.source)
        .bind(&entitlement.ticket_id)
        .bind(entitlement.granted_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to grant entitlement"))?;

        if let Some(stored) = inserted {
            return Ok((stored, true));
        }

        sqlx::query_as::<_, Entitlement>(
            "SELECT * FROM entitlements WHERE user_id = $1 AND event_id = $2 \
             AND session_id IS NOT DISTINCT FROM $3",
        )
        .bind(entitlement.user_id)
        .bind(entitlement.event_id)
        .bind(entitlement.session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to load entitlement"))?
        .map(|existing| (existing, false))
        .ok_or_else(|| AppError::database("Entitlement vanished after conflict"))
    }
}
