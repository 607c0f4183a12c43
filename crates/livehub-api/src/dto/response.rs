//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Result of deleting a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDeletedResponse {
    pub room_name: String,
    pub sessions_cleared: u64,
}

/// Generic deletion acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Attendance join acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinResponse {
    pub attendance_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    pub version: String,
    pub database: String,
    pub uptime_seconds: u64,
}
