//! Persisted action log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::ActionKind;

/// One entry of a session's replayable action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ActionRecord {
    pub id: Uuid,
    pub session_id: Uuid,
    /// Wire name of the action kind.
    pub action_type: String,
    /// The full validated action object.
    pub payload: serde_json::Value,
    /// Moderator who saved the action.
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ActionRecord {
    pub fn kind(&self) -> Option<ActionKind> {
        ActionKind::from_wire(&self.action_type)
    }
}

/// Data required to append an action.
#[derive(Debug, Clone)]
pub struct CreateActionRecord {
    pub session_id: Uuid,
    pub kind: ActionKind,
    pub payload: serde_json::Value,
    pub created_by: Option<Uuid>,
}

impl CreateActionRecord {
    pub fn into_record(self, now: DateTime<Utc>) -> ActionRecord {
        ActionRecord {
            id: Uuid::new_v4(),
            session_id: self.session_id,
            action_type: self.kind.as_str().to_string(),
            payload: self.payload,
            created_by: self.created_by,
            created_at: now,
        }
    }
}
