//! Session content handlers.

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use uuid::Uuid;

use livehub_entity::session::{CreateSession, Session, UpdateSession};
use livehub_service::session::StatusReport;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateSession>,
) -> Result<Json<ApiResponse<Session>>, ApiError> {
    let session = state.session_service.create_session(&auth, req).await?;
    Ok(Json(ApiResponse::ok(session)))
}

/// PUT /api/sessions/{id}
pub async fn update_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSession>,
) -> Result<Json<ApiResponse<Session>>, ApiError> {
    let session = state.session_service.update_session(&auth, id, req).await?;
    Ok(Json(ApiResponse::ok(session)))
}

/// GET /api/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Session>>, ApiError> {
    let session = state.session_service.get_session(id).await?;
    Ok(Json(ApiResponse::ok(session)))
}

/// GET /api/sessions/{id}/status
pub async fn session_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StatusReport>>, ApiError> {
    let report = state.session_service.status(id, Utc::now()).await?;
    Ok(Json(ApiResponse::ok(report)))
}
