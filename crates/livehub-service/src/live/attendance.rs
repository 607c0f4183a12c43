//! Attendance log.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use livehub_core::error::AppError;
use livehub_database::store::{AttendanceStore, SessionStore};
use livehub_entity::attendance::{AttendanceRecord, CreateAttendance};

use crate::context::RequestContext;

#[derive(Debug, Clone)]
pub struct AttendanceService {
    sessions: Arc<dyn SessionStore>,
    attendance: Arc<dyn AttendanceStore>,
}

impl AttendanceService {
    pub fn new(sessions: Arc<dyn SessionStore>, attendance: Arc<dyn AttendanceStore>) -> Self {
        Self {
            sessions,
            attendance,
        }
    }

    /// Open an attendance record. The caller's identity is used when known.
    pub async fn join(
        &self,
        ctx: &RequestContext,
        session_id: Uuid,
        user_name: Option<String>,
    ) -> Result<AttendanceRecord, AppError> {
        if self.sessions.find_by_id(session_id).await?.is_none() {
            return Err(AppError::not_found(format!("Session {session_id} not found")));
        }

        let user_name = user_name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| ctx.principal.as_ref().map(|p| p.display_name().to_string()));

        let record = CreateAttendance {
            session_id,
            user_id: ctx.user_id(),
            user_name,
        }
        .into_record(Utc::now());
        let stored = self.attendance.insert(&record).await?;

        debug!(
            attendance_id = %stored.id,
            session_id = %session_id,
            user_id = ?stored.user_id,
            "Attendance opened"
        );
        Ok(stored)
    }

    /// Close a record. Closing twice keeps the first `left_at`.
    pub async fn leave(&self, attendance_id: Uuid) -> Result<AttendanceRecord, AppError> {
        let record = self
            .attendance
            .close(attendance_id, Utc::now())
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Attendance record {attendance_id} not found"))
            })?;
        debug!(attendance_id = %attendance_id, "Attendance closed");
        Ok(record)
    }

    /// Close records left open longer than `max_open`.
    pub async fn close_stale(&self, max_open: Duration) -> Result<u64, AppError> {
        self.close_stale_at(max_open, Utc::now()).await
    }

    pub async fn close_stale_at(
        &self,
        max_open: Duration,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let closed = self.attendance.close_stale(now - max_open, now).await?;
        if closed > 0 {
            info!(closed, "Auto-closed stale attendance records");
        }
        Ok(closed)
    }
}
