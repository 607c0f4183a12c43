//! `AuthUser` and `MaybeAuthUser` extractors: pull the bearer token from
//! the Authorization header, verify it, and build the request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use livehub_auth::principal::Principal;
use livehub_core::error::AppError;
use livehub_service::context::RequestContext;

use super::client::client_identity;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller. Rejects with 401 when the token is missing or
/// invalid.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Optional caller. Anonymous without an Authorization header; a header
/// carrying a bad token is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub RequestContext);

impl std::ops::Deref for MaybeAuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn bearer_principal(parts: &Parts, state: &AppState) -> Result<Option<Principal>, AppError> {
    let Some(header) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    let token = header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

    state.jwt_decoder.principal(token).map(Some)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = bearer_principal(parts, state)?
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;
        let client = client_identity(&parts.headers, &parts.extensions);
        Ok(Self(RequestContext::authenticated(principal, client)))
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = bearer_principal(parts, state)?;
        let client = client_identity(&parts.headers, &parts.extensions);
        Ok(Self(RequestContext::new(principal, client)))
    }
}
