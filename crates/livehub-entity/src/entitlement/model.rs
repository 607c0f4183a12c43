//! Entitlement entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Where a grant came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "entitlement_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntitlementSource {
    /// Purchased ticket.
    Ticket,
    /// Complimentary pass.
    Comp,
    /// Granted by an operator.
    #[default]
    Manual,
}

/// A durable grant of access to an event, or to one session of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Entitlement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    /// `None` means the grant covers every session of the event.
    pub session_id: Option<Uuid>,
    pub source: EntitlementSource,
    pub ticket_id: Option<String>,
    pub granted_at: DateTime<Utc>,
}

impl Entitlement {
    pub fn is_event_wide(&self) -> bool {
        self.session_id.is_none()
    }

    /// Same (user, event, session) scope, with event-wide grants equal to
    /// each other.
    pub fn same_scope(&self, user_id: Uuid, event_id: Uuid, session_id: Option<Uuid>) -> bool {
        self.user_id == user_id && self.event_id == event_id && self.session_id == session_id
    }
}

/// Data required to grant access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntitlement {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub source: EntitlementSource,
    pub ticket_id: Option<String>,
}

impl CreateEntitlement {
    pub fn into_entitlement(self, now: DateTime<Utc>) -> Entitlement {
        Entitlement {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            event_id: self.event_id,
            session_id: self.session_id,
            source: self.source,
            ticket_id: self.ticket_id,
            granted_at: now,
        }
    }
}

/// Result of an access check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessCheck {
    pub has_access: bool,
    pub entitlement: Option<Entitlement>,
}

impl AccessCheck {
    pub fn granted(entitlement: Entitlement) -> Self {
        Self {
            has_access: true,
            entitlement: Some(entitlement),
        }
    }

    pub fn denied() -> Self {
        Self {
            has_access: false,
            entitlement: None,
        }
    }
}
