//! Request context carrying the caller identity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use livehub_auth::principal::Principal;
use livehub_auth::rbac::RbacEnforcer;
use livehub_core::error::AppError;

/// Context for the current request.
///
/// Built by the HTTP layer and passed into service methods so that every
/// operation knows *who* is acting, if anyone.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Verified caller; `None` for anonymous requests.
    pub principal: Option<Principal>,
    /// Client identity used for logging (forwarded address or peer).
    pub client: String,
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(principal: Option<Principal>, client: impl Into<String>) -> Self {
        Self {
            principal,
            client: client.into(),
            request_time: Utc::now(),
        }
    }

    pub fn anonymous(client: impl Into<String>) -> Self {
        Self::new(None, client)
    }

    pub fn authenticated(principal: Principal, client: impl Into<String>) -> Self {
        Self::new(Some(principal), client)
    }

    /// The caller, or an authentication error.
    pub fn require_principal(&self) -> Result<&Principal, AppError> {
        self.principal
            .as_ref()
            .ok_or_else(|| AppError::authentication("Authentication required"))
    }

    /// The caller, who must be an admin or moderator.
    pub fn require_elevated(&self) -> Result<&Principal, AppError> {
        let principal = self.require_principal()?;
        RbacEnforcer::require_elevated(principal)?;
        Ok(principal)
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.principal.as_ref().map(|p| p.user_id)
    }

    pub fn is_elevated(&self) -> bool {
        self.principal.as_ref().is_some_and(Principal::is_elevated)
    }
}
