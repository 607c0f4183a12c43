//! Attendance handlers.

use axum::Json;
use axum::extract::State;

use livehub_entity::attendance::AttendanceRecord;

use crate::dto::request::{JoinRequest, LeaveRequest};
use crate::dto::response::{ApiResponse, JoinResponse};
use crate::error::ApiError;
use crate::extractors::{MaybeAuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/live/attendance/join
pub async fn join(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    ValidatedJson(req): ValidatedJson<JoinRequest>,
) -> Result<Json<ApiResponse<JoinResponse>>, ApiError> {
    let record = state
        .attendance_service
        .join(&auth, req.session_id, req.user_name)
        .await?;
    Ok(Json(ApiResponse::ok(JoinResponse {
        attendance_id: record.id,
        joined_at: record.joined_at,
    })))
}

/// POST /api/live/attendance/leave
pub async fn leave(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LeaveRequest>,
) -> Result<Json<ApiResponse<AttendanceRecord>>, ApiError> {
    let record = state.attendance_service.leave(req.attendance_id).await?;
    Ok(Json(ApiResponse::ok(record)))
}
