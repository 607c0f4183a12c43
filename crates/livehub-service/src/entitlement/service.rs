//! Entitlement checks and grants.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use livehub_auth::rbac::RbacEnforcer;
use livehub_core::error::AppError;
use livehub_database::store::{EntitlementStore, SessionStore};
use livehub_entity::entitlement::{
    AccessCheck, CreateEntitlement, Entitlement, EntitlementSource,
};

use crate::context::RequestContext;

/// A grant request. `user_id` defaults to the caller.
#[derive(Debug, Clone, Default)]
pub struct GrantRequest {
    pub user_id: Option<Uuid>,
    pub event_id: Uuid,
    pub session_id: Option<Uuid>,
    pub source: EntitlementSource,
    pub ticket_id: Option<String>,
}

/// Result of a grant.
#[derive(Debug, Clone, Serialize)]
pub struct Granted {
    #[serde(flatten)]
    pub entitlement: Entitlement,
    /// False when the scope was already granted.
    pub created: bool,
}

#[derive(Debug, Clone)]
pub struct EntitlementService {
    sessions: Arc<dyn SessionStore>,
    entitlements: Arc<dyn EntitlementStore>,
}

impl EntitlementService {
    pub fn new(sessions: Arc<dyn SessionStore>, entitlements: Arc<dyn EntitlementStore>) -> Self {
        Self {
            sessions,
            entitlements,
        }
    }

    /// Whether a user may access an event or session.
    ///
    /// A session scope matches session grants only, except when the event
    /// was not given: then an event-wide grant for the session's event
    /// also counts.
    pub async fn check_access(
        &self,
        ctx: &RequestContext,
        user_id: Option<Uuid>,
        event_id: Option<Uuid>,
        session_id: Option<Uuid>,
    ) -> Result<AccessCheck, AppError> {
        let principal = ctx.require_principal()?;
        let user_id = RbacEnforcer::acting_user(principal, user_id)?;

        let found = match (event_id, session_id) {
            (None, None) => {
                return Err(AppError::validation(
                    "event_id or session_id is required",
                ));
            }
            (Some(event_id), None) => {
                self.entitlements
                    .find_event_wide(user_id, event_id)
                    .await?
            }
            (event_id, Some(session_id)) => {
                let exact = self
                    .entitlements
                    .find_for_session(user_id, session_id, event_id)
                    .await?;
                match (exact, event_id) {
                    (Some(found), _) => Some(found),
                    (None, Some(_)) => None,
                    (None, None) => self.event_wide_for_session(user_id, session_id).await?,
                }
            }
        };

        debug!(
            user_id = %user_id,
            event_id = ?event_id,
            session_id = ?session_id,
            has_access = found.is_some(),
            "Entitlement checked"
        );
        Ok(found.map_or_else(AccessCheck::denied, AccessCheck::granted))
    }

    /// Grant access. A grant for an existing scope returns the stored one.
    pub async fn grant(&self, ctx: &RequestContext, request: GrantRequest) -> Result<Granted, AppError> {
        let principal = ctx.require_principal()?;
        let user_id = RbacEnforcer::acting_user(principal, request.user_id)?;

        if let Some(session_id) = request.session_id {
            let session = self
                .sessions
                .find_by_id(session_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))?;
            if session.event_id != request.event_id {
                return Err(AppError::validation(
                    "Session does not belong to the given event",
                ));
            }
        }

        let entitlement = CreateEntitlement {
            user_id,
            event_id: request.event_id,
            session_id: request.session_id,
            source: request.source,
            ticket_id: request.ticket_id,
        }
        .into_entitlement(Utc::now());

        let (stored, created) = self.entitlements.insert_if_absent(&entitlement).await?;
        if created {
            info!(
                entitlement_id = %stored.id,
                user_id = %user_id,
                event_id = %stored.event_id,
                session_id = ?stored.session_id,
                granted_by = %principal.user_id,
                "Entitlement granted"
            );
        }
        Ok(Granted {
            entitlement: stored,
            created,
        })
    }

    async fn event_wide_for_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<Option<Entitlement>, AppError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))?;
        self.entitlements
            .find_event_wide(user_id, session.event_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use livehub_auth::principal::Principal;
    use livehub_core::error::ErrorKind;
    use livehub_database::memory::{MemoryEntitlementStore, MemorySessionStore};
    use livehub_entity::session::{CreateSession, SessionFormat, StreamMode};
    use livehub_entity::user::UserRole;

    struct Fixture {
        service: EntitlementService,
        event_id: Uuid,
        session_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let sessions = Arc::new(MemorySessionStore::new());
        let event_id = Uuid::new_v4();
        let now = Utc::now();
        let session = sessions
            .insert(
                &CreateSession {
                    event_id,
                    title: "Deep dive".into(),
                    format: SessionFormat::Virtual,
                    stream_mode: StreamMode::Call,
                    start_date: now,
                    end_date: now + Duration::hours(1),
                    published: true,
                    max_attendees: None,
                    speaker_emails: vec![],
                }
                .into_session(now),
            )
            .await
            .unwrap();
        Fixture {
            service: EntitlementService::new(sessions, Arc::new(MemoryEntitlementStore::new())),
            event_id,
            session_id: session.id,
        }
    }

    fn ctx(role: UserRole) -> RequestContext {
        RequestContext::authenticated(
            Principal {
                user_id: Uuid::new_v4(),
                email: "user@example.com".into(),
                name: None,
                role,
            },
            "127.0.0.1",
        )
    }

    #[tokio::test]
    async fn test_duplicate_grant_returns_same_record() {
        let f = fixture().await;
        let user = ctx(UserRole::Attendee);
        let request = GrantRequest {
            event_id: f.event_id,
            session_id: Some(f.session_id),
            source: EntitlementSource::Ticket,
            ticket_id: Some("T-1".into()),
            ..Default::default()
        };

        let first = f.service.grant(&user, request.clone()).await.unwrap();
        let second = f.service.grant(&user, request).await.unwrap();
        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.entitlement.id, second.entitlement.id);
    }

    #[tokio::test]
    async fn test_event_wide_grant_covers_session_only_check() {
        let f = fixture().await;
        let user = ctx(UserRole::Attendee);
        f.service
            .grant(
                &user,
                GrantRequest {
                    event_id: f.event_id,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let by_session = f
            .service
            .check_access(&user, None, None, Some(f.session_id))
            .await
            .unwrap();
        assert!(by_session.has_access);
        assert!(by_session.entitlement.unwrap().is_event_wide());

        // With the event given the match is exact, so there is no fallback.
        let exact = f
            .service
            .check_access(&user, None, Some(f.event_id), Some(f.session_id))
            .await
            .unwrap();
        assert!(!exact.has_access);

        let by_event = f
            .service
            .check_access(&user, None, Some(f.event_id), None)
            .await
            .unwrap();
        assert!(by_event.has_access);
    }

    #[tokio::test]
    async fn test_session_grant_does_not_cover_event() {
        let f = fixture().await;
        let user = ctx(UserRole::Attendee);
        f.service
            .grant(
                &user,
                GrantRequest {
                    event_id: f.event_id,
                    session_id: Some(f.session_id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(
            f.service
                .check_access(&user, None, None, Some(f.session_id))
                .await
                .unwrap()
                .has_access
        );
        assert!(
            !f.service
                .check_access(&user, None, Some(f.event_id), None)
                .await
                .unwrap()
                .has_access
        );
    }

    #[tokio::test]
    async fn test_scope_and_session_errors() {
        let f = fixture().await;
        let user = ctx(UserRole::Attendee);

        let err = f.service.check_access(&user, None, None, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = f
            .service
            .check_access(&user, None, None, Some(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = f
            .service
            .grant(
                &user,
                GrantRequest {
                    event_id: Uuid::new_v4(),
                    session_id: Some(f.session_id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_acting_for_another_user() {
        let f = fixture().await;
        let other = Uuid::new_v4();

        let err = f
            .service
            .check_access(&ctx(UserRole::Attendee), Some(other), Some(f.event_id), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let admin = ctx(UserRole::Admin);
        let granted = f
            .service
            .grant(
                &admin,
                GrantRequest {
                    user_id: Some(other),
                    event_id: f.event_id,
                    source: EntitlementSource::Comp,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(granted.entitlement.user_id, other);
        assert!(
            f.service
                .check_access(&admin, Some(other), Some(f.event_id), None)
                .await
                .unwrap()
                .has_access
        );
    }
}
