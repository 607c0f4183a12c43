//! Room lifecycle driven by session changes and explicit admin calls.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use livehub_core::config::ConferenceConfig;
use livehub_core::error::AppError;
use livehub_core::traits::ConferenceProvider;
use livehub_core::types::conference::{ProviderRoom, RoomDeletion, RoomProperties};
use livehub_database::store::SessionStore;
use livehub_entity::session::{ROOM_CLAIM_PREFIX, Session, SessionChanged, SessionFormat};

use super::properties::room_request;
use crate::context::RequestContext;

/// A session's link to its provider room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomLink {
    pub session_id: Uuid,
    pub room_name: String,
    pub room_url: String,
    /// False when the session already had this room.
    pub created: bool,
}

/// Outcome of trying to create a room for a session.
#[derive(Debug)]
enum Provision {
    Created(ProviderRoom),
    /// Another caller holds the claim or a room already exists.
    Busy,
}

/// Creates and tears down provider rooms.
///
/// Creation is guarded by the store's claim protocol, so at most one
/// remote room is created per session however many triggers race. A claim
/// older than `room_claim_ttl_seconds` is presumed abandoned and may be
/// taken over.
#[derive(Debug, Clone)]
pub struct RoomLifecycle {
    sessions: Arc<dyn SessionStore>,
    provider: Arc<dyn ConferenceProvider>,
    config: ConferenceConfig,
}

impl RoomLifecycle {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        provider: Arc<dyn ConferenceProvider>,
        config: ConferenceConfig,
    ) -> Self {
        Self {
            sessions,
            provider,
            config,
        }
    }

    /// Reconcile the room of a changed session.
    ///
    /// Reads the session back from the store, since the store is the
    /// source of truth for the room link and the event may be stale.
    pub async fn on_session_changed(&self, event: &SessionChanged) -> Result<(), AppError> {
        let Some(session) = self.sessions.find_by_id(event.current.id).await? else {
            warn!(session_id = %event.current.id, "Changed session no longer exists");
            return Ok(());
        };

        let now = Utc::now();
        let stale_before = self.stale_before(now);
        let abandoned = session.claim_expired(stale_before);
        if session.needs_room()
            || (abandoned && session.format.needs_room() && session.is_published())
        {
            if abandoned {
                warn!(
                    session_id = %session.id,
                    claimed_at = ?session.room_claimed_at,
                    "Taking over an abandoned room claim"
                );
            }
            if let Provision::Created(room) = self.provision(&session, now).await? {
                info!(
                    session_id = %session.id,
                    room = %room.name,
                    "Room created for published session"
                );
            }
        } else if session.has_stale_room() {
            if let Some(room_name) = session.active_room() {
                let cleared = self.teardown(room_name).await?;
                info!(
                    session_id = %session.id,
                    room = %room_name,
                    cleared,
                    "Room removed from in-person session"
                );
            }
        }
        Ok(())
    }

    /// Explicitly create (or return) the room of a session.
    pub async fn create_room(
        &self,
        ctx: &RequestContext,
        session_id: Uuid,
    ) -> Result<RoomLink, AppError> {
        let actor = ctx.require_elevated()?;
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))?;

        if session.format == SessionFormat::InPerson {
            return Err(AppError::validation(
                "In-person sessions do not have live rooms",
            ));
        }

        if let (Some(name), Some(url)) = (session.active_room(), session.active_room_url()) {
            return Ok(RoomLink {
                session_id,
                room_name: name.to_string(),
                room_url: url.to_string(),
                created: false,
            });
        }

        match self.provision(&session, Utc::now()).await? {
            Provision::Created(room) => {
                info!(
                    session_id = %session_id,
                    room = %room.name,
                    actor = %actor.user_id,
                    "Room created on request"
                );
                Ok(RoomLink {
                    session_id,
                    room_name: room.name,
                    room_url: room.url,
                    created: true,
                })
            }
            Provision::Busy => Err(AppError::conflict(
                "A room is already being created for this session",
            )),
        }
    }

    /// Delete a room and unlink every session that references it.
    /// Returns how many sessions were cleared.
    pub async fn delete_room(&self, ctx: &RequestContext, room_name: &str) -> Result<u64, AppError> {
        let actor = ctx.require_elevated()?;
        check_room_name(room_name)?;

        let cleared = self.teardown(room_name).await?;
        info!(room = %room_name, cleared, actor = %actor.user_id, "Room deleted on request");
        Ok(cleared)
    }

    /// Forward new properties for an existing room to the provider.
    pub async fn update_room_properties(
        &self,
        ctx: &RequestContext,
        room_name: &str,
        properties: &RoomProperties,
    ) -> Result<ProviderRoom, AppError> {
        let actor = ctx.require_elevated()?;
        check_room_name(room_name)?;

        let room = self.provider.update_room(room_name, properties).await?;
        info!(room = %room_name, actor = %actor.user_id, "Room properties updated");
        Ok(room)
    }

    /// Claims taken before this instant are abandoned.
    fn stale_before(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.config.room_claim_ttl())
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Claim the session, create the room, store it. On failure the claim
    /// is released so the next qualifying update retries.
    async fn provision(
        &self,
        session: &Session,
        now: DateTime<Utc>,
    ) -> Result<Provision, AppError> {
        let claim = format!("{ROOM_CLAIM_PREFIX}{}", Uuid::new_v4());
        let stale_before = self.stale_before(now);
        if !self
            .sessions
            .claim_room(session.id, &claim, now, stale_before)
            .await?
        {
            return Ok(Provision::Busy);
        }

        let request = room_request(session, &self.config, now);
        let room = match self.provider.create_room(&request).await {
            Ok(room) => room,
            Err(e) => {
                error!(session_id = %session.id, error = %e, "Room creation failed");
                self.release(session.id, &claim).await;
                return Err(e);
            }
        };

        match self
            .sessions
            .set_room(session.id, &claim, &room.name, &room.url)
            .await
        {
            Ok(true) => Ok(Provision::Created(room)),
            Ok(false) => {
                // Taken over, or the session turned in-person meanwhile.
                warn!(
                    session_id = %session.id,
                    room = %room.name,
                    "Room could not be stored on the session; deleting orphan"
                );
                self.release(session.id, &claim).await;
                self.discard_orphan(&room.name).await;
                Err(AppError::conflict(
                    "Session changed while its room was being created",
                ))
            }
            Err(e) => {
                error!(session_id = %session.id, room = %room.name, error = %e, "Failed to store room");
                self.release(session.id, &claim).await;
                self.discard_orphan(&room.name).await;
                Err(e)
            }
        }
    }

    async fn teardown(&self, room_name: &str) -> Result<u64, AppError> {
        if self.provider.delete_room(room_name).await? == RoomDeletion::AlreadyGone {
            info!(room = %room_name, "Room was already gone at the provider");
        }
        self.sessions.clear_room_everywhere(room_name).await
    }

    async fn release(&self, session_id: Uuid, claim: &str) {
        if let Err(e) = self.sessions.release_claim(session_id, claim).await {
            error!(session_id = %session_id, error = %e, "Failed to release room claim");
        }
    }

    async fn discard_orphan(&self, room_name: &str) {
        if let Err(e) = self.provider.delete_room(room_name).await {
            error!(room = %room_name, error = %e, "Failed to delete orphaned room");
        }
    }
}

fn check_room_name(room_name: &str) -> Result<(), AppError> {
    if room_name.trim().is_empty() || room_name.starts_with(ROOM_CLAIM_PREFIX) {
        return Err(AppError::validation("Invalid room name"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use livehub_auth::principal::Principal;
    use livehub_conference::MockConferenceProvider;
    use livehub_core::error::ErrorKind;
    use livehub_database::memory::MemorySessionStore;
    use livehub_entity::session::{CreateSession, StreamMode, UpdateSession};
    use livehub_entity::user::UserRole;

    struct Fixture {
        sessions: Arc<MemorySessionStore>,
        provider: Arc<MockConferenceProvider>,
        lifecycle: RoomLifecycle,
    }

    fn fixture() -> Fixture {
        let sessions = Arc::new(MemorySessionStore::new());
        let provider = Arc::new(MockConferenceProvider::new());
        let lifecycle = RoomLifecycle::new(
            sessions.clone(),
            provider.clone(),
            ConferenceConfig::default(),
        );
        Fixture {
            sessions,
            provider,
            lifecycle,
        }
    }

    fn admin() -> RequestContext {
        RequestContext::authenticated(
            Principal {
                user_id: Uuid::new_v4(),
                email: "admin@example.com".into(),
                name: None,
                role: UserRole::Admin,
            },
            "127.0.0.1",
        )
    }

    fn new_session(format: SessionFormat, published: bool) -> Session {
        let now = Utc::now();
        CreateSession {
            event_id: Uuid::new_v4(),
            title: "Workshop".into(),
            format,
            stream_mode: StreamMode::Call,
            start_date: now,
            end_date: now + Duration::hours(1),
            published,
            max_attendees: None,
            speaker_emails: vec![],
        }
        .into_session(now)
    }

    async fn write(f: &Fixture, data: UpdateSession, id: Uuid) -> SessionChanged {
        let current = f.sessions.find_by_id(id).await.unwrap().unwrap();
        let next = data.apply(&current, Utc::now());
        let stored = f.sessions.update_content(&next).await.unwrap().unwrap();
        SessionChanged::updated(current, stored)
    }

    #[tokio::test]
    async fn test_publish_twice_creates_one_room() {
        let f = fixture();
        let draft = f
            .sessions
            .insert(&new_session(SessionFormat::Virtual, false))
            .await
            .unwrap();

        let publish = UpdateSession {
            published: Some(true),
            ..Default::default()
        };
        let event = write(&f, publish.clone(), draft.id).await;
        f.lifecycle.on_session_changed(&event).await.unwrap();
        f.lifecycle.on_session_changed(&event).await.unwrap();

        let again = write(&f, publish, draft.id).await;
        f.lifecycle.on_session_changed(&again).await.unwrap();

        assert_eq!(f.provider.create_count(), 1);
        let stored = f.sessions.find_by_id(draft.id).await.unwrap().unwrap();
        assert_eq!(stored.active_room(), Some("mock-room-1"));
        assert!(stored.room_url.is_some());
    }

    #[tokio::test]
    async fn test_publish_then_in_person_end_to_end() {
        let f = fixture();
        let draft = f
            .sessions
            .insert(&new_session(SessionFormat::Virtual, false))
            .await
            .unwrap();

        let before = Utc::now();
        let event = write(
            &f,
            UpdateSession {
                published: Some(true),
                ..Default::default()
            },
            draft.id,
        )
        .await;
        f.lifecycle.on_session_changed(&event).await.unwrap();

        let created = f.provider.created_rooms();
        assert_eq!(created.len(), 1);
        let exp = created[0].properties.exp.unwrap();
        let expected = (before + Duration::hours(24)).timestamp();
        assert!((exp - expected).abs() <= 5);
        assert_eq!(created[0].properties.enable_knocking, Some(false));

        let linked = f.sessions.find_by_id(draft.id).await.unwrap().unwrap();
        let room = linked.active_room().unwrap().to_string();

        // A second session sharing the room is cleaned up as well.
        let sibling = f
            .sessions
            .insert(&new_session(SessionFormat::Hybrid, true))
            .await
            .unwrap();
        let now = Utc::now();
        f.sessions
            .claim_room(sibling.id, "claim:t", now, now)
            .await
            .unwrap();
        f.sessions
            .set_room(sibling.id, "claim:t", &room, "https://mock.conference.test/x")
            .await
            .unwrap();

        let event = write(
            &f,
            UpdateSession {
                format: Some(SessionFormat::InPerson),
                ..Default::default()
            },
            draft.id,
        )
        .await;
        f.lifecycle.on_session_changed(&event).await.unwrap();

        assert_eq!(f.provider.deleted_rooms(), vec![room]);
        for id in [draft.id, sibling.id] {
            let s = f.sessions.find_by_id(id).await.unwrap().unwrap();
            assert!(s.room_name.is_none());
            assert!(s.room_url.is_none());
        }
    }

    #[tokio::test]
    async fn test_failed_creation_releases_claim() {
        let f = fixture();
        let session = f
            .sessions
            .insert(&new_session(SessionFormat::Virtual, true))
            .await
            .unwrap();
        let event = SessionChanged::created(session.clone());

        f.provider.fail_next_create("provider down");
        let err = f.lifecycle.on_session_changed(&event).await.unwrap_err();
        assert_eq!(err.message, "provider down");
        let stored = f.sessions.find_by_id(session.id).await.unwrap().unwrap();
        assert!(stored.room_name.is_none());

        f.lifecycle.on_session_changed(&event).await.unwrap();
        assert_eq!(f.provider.create_count(), 2);
        let stored = f.sessions.find_by_id(session.id).await.unwrap().unwrap();
        assert!(stored.active_room().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_triggers_create_one_room() {
        let f = fixture();
        f.provider
            .set_create_delay(std::time::Duration::from_millis(50));
        let session = f
            .sessions
            .insert(&new_session(SessionFormat::Virtual, true))
            .await
            .unwrap();
        let event = SessionChanged::created(session.clone());
        let ctx = admin();

        let (hook, explicit) = tokio::join!(
            f.lifecycle.on_session_changed(&event),
            f.lifecycle.create_room(&ctx, session.id),
        );
        hook.unwrap();
        // The explicit call either won the claim or saw it held.
        if let Err(e) = explicit {
            assert_eq!(e.kind, ErrorKind::Conflict);
        }
        assert_eq!(f.provider.create_count(), 1);
    }

    #[tokio::test]
    async fn test_many_explicit_creates_share_one_room() {
        let f = fixture();
        f.provider
            .set_create_delay(std::time::Duration::from_millis(20));
        let session = f
            .sessions
            .insert(&new_session(SessionFormat::Hybrid, false))
            .await
            .unwrap();
        let ctx = admin();

        let results = futures::future::join_all(
            (0..8).map(|_| f.lifecycle.create_room(&ctx, session.id)),
        )
        .await;

        let created = results
            .iter()
            .filter(|r| r.as_ref().is_ok_and(|link| link.created))
            .count();
        assert_eq!(created, 1);
        for result in &results {
            if let Err(e) = result {
                assert_eq!(e.kind, ErrorKind::Conflict);
            }
        }
        assert_eq!(f.provider.create_count(), 1);

        let stored = f.sessions.find_by_id(session.id).await.unwrap().unwrap();
        assert!(stored.active_room().is_some());
    }

    #[tokio::test]
    async fn test_explicit_create_rules() {
        let f = fixture();
        let ctx = admin();

        let err = f.lifecycle.create_room(&ctx, Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_not_found());

        let in_person = f
            .sessions
            .insert(&new_session(SessionFormat::InPerson, true))
            .await
            .unwrap();
        let err = f.lifecycle.create_room(&ctx, in_person.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let virt = f
            .sessions
            .insert(&new_session(SessionFormat::Virtual, false))
            .await
            .unwrap();
        let first = f.lifecycle.create_room(&ctx, virt.id).await.unwrap();
        assert!(first.created);
        let second = f.lifecycle.create_room(&ctx, virt.id).await.unwrap();
        assert!(!second.created);
        assert_eq!(first.room_name, second.room_name);
        assert_eq!(f.provider.create_count(), 1);

        let held = f
            .sessions
            .insert(&new_session(SessionFormat::Virtual, false))
            .await
            .unwrap();
        let now = Utc::now();
        f.sessions
            .claim_room(held.id, "claim:other", now, now)
            .await
            .unwrap();
        let err = f.lifecycle.create_room(&ctx, held.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_switch_to_in_person_during_creation_leaves_no_room() {
        let f = fixture();
        f.provider
            .set_create_delay(std::time::Duration::from_millis(100));
        let session = f
            .sessions
            .insert(&new_session(SessionFormat::Virtual, false))
            .await
            .unwrap();
        let ctx = admin();

        let switch = async {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            let event = write(
                &f,
                UpdateSession {
                    format: Some(SessionFormat::InPerson),
                    ..Default::default()
                },
                session.id,
            )
            .await;
            f.lifecycle.on_session_changed(&event).await
        };
        let (explicit, hook) = tokio::join!(f.lifecycle.create_room(&ctx, session.id), switch);

        hook.unwrap();
        let err = explicit.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(f.provider.create_count(), 1);
        assert_eq!(f.provider.deleted_rooms(), vec!["mock-room-1".to_string()]);

        let stored = f.sessions.find_by_id(session.id).await.unwrap().unwrap();
        assert_eq!(stored.format, SessionFormat::InPerson);
        assert!(stored.room_name.is_none());
        assert!(stored.room_url.is_none());
    }

    #[tokio::test]
    async fn test_abandoned_claim_is_taken_over() {
        let f = fixture();
        let ctx = admin();
        let long_ago = Utc::now() - Duration::hours(1);

        // Left behind by a creator that never finished.
        let published = f
            .sessions
            .insert(&new_session(SessionFormat::Virtual, true))
            .await
            .unwrap();
        f.sessions
            .claim_room(published.id, "claim:crashed", long_ago, long_ago)
            .await
            .unwrap();
        let event = SessionChanged::created(published.clone());
        f.lifecycle.on_session_changed(&event).await.unwrap();
        let stored = f.sessions.find_by_id(published.id).await.unwrap().unwrap();
        assert_eq!(stored.active_room(), Some("mock-room-1"));
        assert!(!stored.has_room_claim());

        let draft = f
            .sessions
            .insert(&new_session(SessionFormat::Hybrid, false))
            .await
            .unwrap();
        f.sessions
            .claim_room(draft.id, "claim:crashed", long_ago, long_ago)
            .await
            .unwrap();
        let link = f.lifecycle.create_room(&ctx, draft.id).await.unwrap();
        assert!(link.created);
        assert_eq!(f.provider.create_count(), 2);

        // A fresh claim still belongs to its creator.
        let busy = f
            .sessions
            .insert(&new_session(SessionFormat::Virtual, true))
            .await
            .unwrap();
        let now = Utc::now();
        f.sessions
            .claim_room(busy.id, "claim:working", now, now)
            .await
            .unwrap();
        let err = f.lifecycle.create_room(&ctx, busy.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        f.lifecycle
            .on_session_changed(&SessionChanged::created(busy.clone()))
            .await
            .unwrap();
        assert_eq!(f.provider.create_count(), 2);
    }

    #[tokio::test]
    async fn test_explicit_create_surfaces_provider_text() {
        let f = fixture();
        let session = f
            .sessions
            .insert(&new_session(SessionFormat::Virtual, false))
            .await
            .unwrap();
        f.provider.fail_next_create("account over room limit");

        let err = f.lifecycle.create_room(&admin(), session.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert_eq!(err.message, "account over room limit");
    }

    #[tokio::test]
    async fn test_delete_room_counts_cleared_sessions() {
        let f = fixture();
        let ctx = admin();
        let session = f
            .sessions
            .insert(&new_session(SessionFormat::Virtual, false))
            .await
            .unwrap();
        let link = f.lifecycle.create_room(&ctx, session.id).await.unwrap();

        let cleared = f.lifecycle.delete_room(&ctx, &link.room_name).await.unwrap();
        assert_eq!(cleared, 1);
        // Deleting again is harmless: the provider reports it gone.
        assert_eq!(f.lifecycle.delete_room(&ctx, &link.room_name).await.unwrap(), 0);

        let err = f.lifecycle.delete_room(&ctx, "claim:x").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_control_requires_elevated_role() {
        let f = fixture();
        let attendee = RequestContext::authenticated(
            Principal {
                user_id: Uuid::new_v4(),
                email: "a@example.com".into(),
                name: None,
                role: UserRole::Attendee,
            },
            "127.0.0.1",
        );
        let err = f.lifecycle.create_room(&attendee, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        let err = f
            .lifecycle
            .update_room_properties(&attendee, "room", &RoomProperties::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }
}
