//! Chat handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use livehub_entity::chat::{ChatMessage, CreateChatMessage};
use livehub_service::live::SavedChat;

use crate::dto::request::SaveChatRequest;
use crate::dto::response::{ApiResponse, DeletedResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, MaybeAuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/live/chat
pub async fn save_chat(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    ValidatedJson(req): ValidatedJson<SaveChatRequest>,
) -> Result<Json<ApiResponse<SavedChat>>, ApiError> {
    let saved = state
        .chat_service
        .save(
            &auth,
            CreateChatMessage {
                session_id: req.session_id,
                message_id: req.message_id,
                sender_id: None,
                sender_name: req.sender_name,
                message: req.message,
                timestamp: req.timestamp,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(saved)))
}

/// GET /api/live/chat/{session_id}
pub async fn list_chat(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, ApiError> {
    let messages = state.chat_service.list(session_id).await?;
    Ok(Json(ApiResponse::ok(messages)))
}

/// DELETE /api/live/chat/{message_id}
pub async fn delete_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<String>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    state.chat_service.delete(&auth, &message_id).await?;
    Ok(Json(ApiResponse::ok(DeletedResponse { deleted: true })))
}
