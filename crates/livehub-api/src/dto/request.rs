//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

use livehub_core::types::conference::RoomProperties;
use livehub_entity::entitlement::EntitlementSource;

/// Explicit room creation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRoomRequest {
    pub session_id: Uuid,
}

/// New properties for an existing room.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRoomPropertiesRequest {
    pub properties: RoomProperties,
}

/// Meeting-token request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MeetingTokenRequest {
    pub session_id: Uuid,
    /// Name shown in the room; defaults to the caller's name.
    #[validate(length(max = 200, message = "user_name is too long"))]
    pub user_name: Option<String>,
}

/// Broadcast an action to a room.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendActionRequest {
    #[validate(length(min = 1, message = "room_name is required"))]
    pub room_name: String,
    /// Checked by the action validator, not here.
    pub action: Value,
}

/// Save an action to a session's log. The action's own keys sit next to
/// `session_id`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveActionRequest {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub action: Map<String, Value>,
}

/// Save a chat message.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveChatRequest {
    pub session_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "message_id is required"))]
    pub message_id: String,
    #[validate(length(min = 1, max = 200, message = "sender_name is required"))]
    pub sender_name: String,
    #[validate(length(min = 1, max = 4000, message = "message is required"))]
    pub message: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Record a join.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JoinRequest {
    pub session_id: Uuid,
    #[validate(length(max = 200, message = "user_name is too long"))]
    pub user_name: Option<String>,
}

/// Record a leave.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LeaveRequest {
    pub attendance_id: Uuid,
}

/// Entitlement check. At least one scope is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CheckEntitlementRequest {
    /// Defaults to the caller; other users need an elevated role.
    pub user_id: Option<Uuid>,
    pub event_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
}

/// Entitlement grant.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GrantEntitlementRequest {
    pub user_id: Option<Uuid>,
    pub event_id: Uuid,
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub source: EntitlementSource,
    #[validate(length(min = 1, max = 200, message = "ticket_id must not be empty"))]
    pub ticket_id: Option<String>,
}
