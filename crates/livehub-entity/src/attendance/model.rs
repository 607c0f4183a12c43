//! Attendance record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One stay of a participant in a live room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub session_id: Uuid,
    /// Authenticated participant, if any.
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
    /// Closed by the stale-record job instead of an explicit leave.
    pub auto_closed: bool,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.left_at.is_none()
    }
}

/// Data required to open an attendance record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAttendance {
    pub session_id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
}

impl CreateAttendance {
    pub fn into_record(self, now: DateTime<Utc>) -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4(),
            session_id: self.session_id,
            user_id: self.user_id,
            user_name: self.user_name,
            joined_at: now,
            left_at: None,
            auto_closed: false,
        }
    }
}
