//! Live action handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::Value;
use uuid::Uuid;

use livehub_entity::action::ActionRecord;

use crate::dto::request::{SaveActionRequest, SendActionRequest};
use crate::dto::response::{ApiResponse, DeletedResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/live/actions/send
pub async fn send_action(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<SendActionRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let ack = state
        .action_service
        .send_action(&auth, &req.room_name, &req.action)
        .await?;
    Ok(Json(ApiResponse::ok(ack)))
}

/// POST /api/live/actions
pub async fn save_action(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<SaveActionRequest>,
) -> Result<Json<ApiResponse<ActionRecord>>, ApiError> {
    let record = state
        .action_service
        .save_action(&auth, req.session_id, &Value::Object(req.action))
        .await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// GET /api/live/actions/{session_id}
pub async fn list_actions(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ActionRecord>>>, ApiError> {
    let actions = state.action_service.list_actions(session_id).await?;
    Ok(Json(ApiResponse::ok(actions)))
}

/// DELETE /api/live/actions/{action_id}
pub async fn remove_action(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(action_id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    state.action_service.remove_action(&auth, action_id).await?;
    Ok(Json(ApiResponse::ok(DeletedResponse { deleted: true })))
}
