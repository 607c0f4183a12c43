//! Session content write path.
//!
//! Every committed write publishes a [`SessionChanged`] event; room
//! reconciliation happens downstream and never blocks the write.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use livehub_core::error::AppError;
use livehub_database::events::SessionEventBus;
use livehub_database::store::SessionStore;
use livehub_entity::session::{
    CreateSession, LiveStatus, Session, SessionChanged, UpdateSession,
};

use super::status::{SessionStatus, StatusPolicy};
use crate::context::RequestContext;

/// Creates, updates and reads sessions.
#[derive(Debug, Clone)]
pub struct SessionContentService {
    sessions: Arc<dyn SessionStore>,
    events: SessionEventBus,
    status: StatusPolicy,
}

/// Status of a session at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub live_status: LiveStatus,
    /// When to ask again; absent while an override is set.
    pub refresh_after_seconds: Option<u64>,
}

impl SessionContentService {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        events: SessionEventBus,
        status: StatusPolicy,
    ) -> Self {
        Self {
            sessions,
            events,
            status,
        }
    }

    pub async fn create_session(
        &self,
        ctx: &RequestContext,
        data: CreateSession,
    ) -> Result<Session, AppError> {
        let actor = ctx.require_elevated()?;
        let session = data.into_session(Utc::now());
        check_content(&session)?;

        let stored = self.sessions.insert(&session).await?;
        info!(
            session_id = %stored.id,
            event_id = %stored.event_id,
            format = %stored.format,
            published = stored.is_published(),
            actor = %actor.user_id,
            "Session created"
        );

        self.events.publish(SessionChanged::created(stored.clone()));
        Ok(stored)
    }

    pub async fn update_session(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        data: UpdateSession,
    ) -> Result<Session, AppError> {
        let actor = ctx.require_elevated()?;
        let previous = self.get_session(id).await?;

        let next = data.apply(&previous, Utc::now());
        check_content(&next)?;

        let stored = self
            .sessions
            .update_content(&next)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {id} not found")))?;

        info!(
            session_id = %id,
            format = %stored.format,
            published = stored.is_published(),
            actor = %actor.user_id,
            "Session updated"
        );

        self.events
            .publish(SessionChanged::updated(previous, stored.clone()));
        Ok(stored)
    }

    pub async fn get_session(&self, id: Uuid) -> Result<Session, AppError> {
        self.sessions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {id} not found")))
    }

    /// Resolve the status of a session at `now`.
    pub async fn status(&self, id: Uuid, now: DateTime<Utc>) -> Result<StatusReport, AppError> {
        let session = self.get_session(id).await?;
        Ok(StatusReport {
            session_id: session.id,
            status: self.status.resolve(
                session.start_date,
                session.end_date,
                session.live_status,
                now,
            ),
            live_status: session.live_status,
            refresh_after_seconds: self
                .status
                .refresh_hint(session.live_status)
                .map(|d| d.as_secs()),
        })
    }
}

fn check_content(session: &Session) -> Result<(), AppError> {
    if session.title.trim().is_empty() {
        return Err(AppError::validation("title must not be empty"));
    }
    if session.end_date < session.start_date {
        return Err(AppError::validation("end_date must not precede start_date"));
    }
    if session.max_attendees.is_some_and(|m| m < 1) {
        return Err(AppError::validation("max_attendees must be at least 1"));
    }
    Ok(())
}
