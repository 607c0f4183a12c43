//! Entitlement handlers.

use axum::Json;
use axum::extract::State;

use livehub_entity::entitlement::AccessCheck;
use livehub_service::entitlement::{GrantRequest, Granted};

use crate::dto::request::{CheckEntitlementRequest, GrantEntitlementRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/entitlements/check
pub async fn check(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CheckEntitlementRequest>,
) -> Result<Json<ApiResponse<AccessCheck>>, ApiError> {
    let result = state
        .entitlement_service
        .check_access(&auth, req.user_id, req.event_id, req.session_id)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// POST /api/entitlements
pub async fn grant(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<GrantEntitlementRequest>,
) -> Result<Json<ApiResponse<Granted>>, ApiError> {
    let granted = state
        .entitlement_service
        .grant(
            &auth,
            GrantRequest {
                user_id: req.user_id,
                event_id: req.event_id,
                session_id: req.session_id,
                source: req.source,
                ticket_id: req.ticket_id,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(granted)))
}
