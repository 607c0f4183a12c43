//! Room lifecycle and meeting-token handlers.

use axum::Json;
use axum::extract::{Path, State};

use livehub_core::types::conference::ProviderRoom;
use livehub_service::room::{IssuedToken, RoomLink};

use crate::dto::request::{CreateRoomRequest, MeetingTokenRequest, UpdateRoomPropertiesRequest};
use crate::dto::response::{ApiResponse, RoomDeletedResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, MaybeAuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/live/rooms
pub async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateRoomRequest>,
) -> Result<Json<ApiResponse<RoomLink>>, ApiError> {
    let link = state.room_lifecycle.create_room(&auth, req.session_id).await?;
    Ok(Json(ApiResponse::ok(link)))
}

/// DELETE /api/live/rooms/{room_name}
pub async fn delete_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(room_name): Path<String>,
) -> Result<Json<ApiResponse<RoomDeletedResponse>>, ApiError> {
    let sessions_cleared = state.room_lifecycle.delete_room(&auth, &room_name).await?;
    Ok(Json(ApiResponse::ok(RoomDeletedResponse {
        room_name,
        sessions_cleared,
    })))
}

/// POST /api/live/rooms/{room_name}/properties
pub async fn update_room_properties(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(room_name): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateRoomPropertiesRequest>,
) -> Result<Json<ApiResponse<ProviderRoom>>, ApiError> {
    let room = state
        .room_lifecycle
        .update_room_properties(&auth, &room_name, &req.properties)
        .await?;
    Ok(Json(ApiResponse::ok(room)))
}

/// POST /api/live/token
pub async fn meeting_token(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    ValidatedJson(req): ValidatedJson<MeetingTokenRequest>,
) -> Result<Json<ApiResponse<IssuedToken>>, ApiError> {
    let issued = state
        .token_service
        .issue(&auth, req.session_id, req.user_name.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(issued)))
}
