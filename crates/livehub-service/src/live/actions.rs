//! Live action broadcast and the replayable action log.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use livehub_core::error::AppError;
use livehub_core::traits::ConferenceProvider;
use livehub_database::store::{ActionStore, SessionStore};
use livehub_entity::action::{ActionRecord, CreateActionRecord, LiveAction};
use livehub_entity::session::LiveStatus;

use super::validator::validate;
use crate::context::RequestContext;

#[derive(Debug, Clone)]
pub struct ActionService {
    sessions: Arc<dyn SessionStore>,
    actions: Arc<dyn ActionStore>,
    provider: Arc<dyn ConferenceProvider>,
}

impl ActionService {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        actions: Arc<dyn ActionStore>,
        provider: Arc<dyn ConferenceProvider>,
    ) -> Self {
        Self {
            sessions,
            actions,
            provider,
        }
    }

    /// Broadcast an action to everyone in `room_name`. Nothing is stored.
    pub async fn send_action(
        &self,
        ctx: &RequestContext,
        room_name: &str,
        action: &Value,
    ) -> Result<Value, AppError> {
        let actor = ctx.require_elevated()?;
        if room_name.trim().is_empty() {
            return Err(AppError::validation("room_name is required"));
        }
        let action = validate(action)?;

        let ack = self
            .provider
            .send_app_message(room_name, &action.to_payload())
            .await?;

        info!(
            room = %room_name,
            action = %action.kind(),
            actor = %actor.user_id,
            "Live action broadcast"
        );
        Ok(ack)
    }

    /// Append an action to a session's log.
    ///
    /// A `session-status` action also moves the session's live override.
    pub async fn save_action(
        &self,
        ctx: &RequestContext,
        session_id: Uuid,
        action: &Value,
    ) -> Result<ActionRecord, AppError> {
        let actor = ctx.require_elevated()?;
        let action = validate(action)?;

        if self.sessions.find_by_id(session_id).await?.is_none() {
            return Err(AppError::not_found(format!("Session {session_id} not found")));
        }

        let override_status = match &action {
            LiveAction::SessionStatus(s) => Some(parse_status(&s.status)?),
            _ => None,
        };

        let record = CreateActionRecord {
            session_id,
            kind: action.kind(),
            payload: action.to_payload(),
            created_by: Some(actor.user_id),
        }
        .into_record(Utc::now());
        let stored = self.actions.append(&record).await?;

        if let Some(status) = override_status {
            self.sessions.set_live_status(session_id, status).await?;
            info!(session_id = %session_id, status = %status, "Live status override set");
        }

        info!(
            session_id = %session_id,
            action = %stored.action_type,
            actor = %actor.user_id,
            "Live action saved"
        );
        Ok(stored)
    }

    /// Actions of a session, oldest first.
    pub async fn list_actions(&self, session_id: Uuid) -> Result<Vec<ActionRecord>, AppError> {
        self.actions.list_by_session(session_id).await
    }

    pub async fn remove_action(&self, ctx: &RequestContext, action_id: Uuid) -> Result<(), AppError> {
        let actor = ctx.require_elevated()?;
        if !self.actions.delete(action_id).await? {
            return Err(AppError::not_found(format!("Action {action_id} not found")));
        }
        info!(action_id = %action_id, actor = %actor.user_id, "Live action removed");
        Ok(())
    }
}

fn parse_status(status: &Value) -> Result<LiveStatus, AppError> {
    status
        .as_str()
        .ok_or_else(|| AppError::validation("status must be a string"))
        .and_then(LiveStatus::from_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use livehub_auth::principal::Principal;
    use livehub_conference::MockConferenceProvider;
    use livehub_core::error::ErrorKind;
    use livehub_database::memory::{MemoryActionStore, MemorySessionStore};
    use livehub_entity::session::{CreateSession, SessionFormat, StreamMode};
    use livehub_entity::user::UserRole;
    use serde_json::json;

    struct Fixture {
        sessions: Arc<MemorySessionStore>,
        provider: Arc<MockConferenceProvider>,
        service: ActionService,
    }

    fn fixture() -> Fixture {
        let sessions = Arc::new(MemorySessionStore::new());
        let provider = Arc::new(MockConferenceProvider::new());
        let service = ActionService::new(
            sessions.clone(),
            Arc::new(MemoryActionStore::new()),
            provider.clone(),
        );
        Fixture {
            sessions,
            provider,
            service,
        }
    }

    fn ctx(role: UserRole) -> RequestContext {
        RequestContext::authenticated(
            Principal {
                user_id: Uuid::new_v4(),
                email: "mod@example.com".into(),
                name: None,
                role,
            },
            "127.0.0.1",
        )
    }

    async fn session(f: &Fixture) -> Uuid {
        let now = Utc::now();
        f.sessions
            .insert(
                &CreateSession {
                    event_id: Uuid::new_v4(),
                    title: "Panel".into(),
                    format: SessionFormat::InPerson,
                    stream_mode: StreamMode::Call,
                    start_date: now,
                    end_date: now,
                    published: true,
                    max_attendees: None,
                    speaker_emails: vec![],
                }
                .into_session(now),
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_send_broadcasts_validated_action() {
        let f = fixture();
        let ack = f
            .service
            .send_action(
                &ctx(UserRole::Moderator),
                "room-a",
                &json!({"type": "announcement", "message": "Break in 5", "ttl": 30}),
            )
            .await
            .unwrap();
        assert_eq!(ack, json!({"sent": true}));

        let sent = f.provider.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "room-a");
        assert_eq!(
            sent[0].1,
            json!({"type": "announcement", "message": "Break in 5", "ttl": 30})
        );
    }

    #[tokio::test]
    async fn test_send_rejects_invalid_or_unprivileged() {
        let f = fixture();
        let err = f
            .service
            .send_action(&ctx(UserRole::Admin), "room-a", &json!({"type": "poll"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "question is required for poll actions");

        let err = f
            .service
            .send_action(&ctx(UserRole::Attendee), "room-a", &json!({"type": "hand-raise"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert!(f.provider.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn test_save_list_remove() {
        let f = fixture();
        let id = session(&f).await;
        let admin = ctx(UserRole::Admin);

        let first = f
            .service
            .save_action(&admin, id, &json!({"type": "reaction", "emoji": "🎉"}))
            .await
            .unwrap();
        f.service
            .save_action(&admin, id, &json!({"type": "recording-started"}))
            .await
            .unwrap();

        let listed = f.service.list_actions(id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[0].action_type, "reaction");
        assert_eq!(listed[1].action_type, "recording-started");

        f.service.remove_action(&admin, first.id).await.unwrap();
        let err = f.service.remove_action(&admin, first.id).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(f.service.list_actions(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_requires_existing_session() {
        let f = fixture();
        let err = f
            .service
            .save_action(&ctx(UserRole::Admin), Uuid::new_v4(), &json!({"type": "chat-mute"}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_session_status_action_sets_override() {
        let f = fixture();
        let id = session(&f).await;
        let admin = ctx(UserRole::Admin);

        f.service
            .save_action(&admin, id, &json!({"type": "session-status", "status": "live"}))
            .await
            .unwrap();
        let stored = f.sessions.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.live_status, LiveStatus::Live);

        let err = f
            .service
            .save_action(&admin, id, &json!({"type": "session-status", "status": "paused"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(f.service.list_actions(id).await.unwrap().len(), 1);
    }
}
