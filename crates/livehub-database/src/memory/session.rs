//! In-memory session store backed by a `DashMap`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use livehub_core::error::AppError;
use livehub_core::result::AppResult;
use livehub_entity::session::{LiveStatus, Session, SessionFormat};

use crate::store::SessionStore;

/// Sessions keyed by id. Room claim transitions run under the map's
/// per-entry write lock, which makes them atomic per session.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<Uuid, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        Ok(self.sessions.get(&id).map(|s| s.clone()))
    }

    async fn insert(&self, session: &Session) -> AppResult<Session> {
        match self.sessions.entry(session.id) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Session {} already exists",
                session.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(session.clone());
                Ok(session.clone())
            }
        }
    }

    async fn update_content(&self, session: &Session) -> AppResult<Option<Session>> {
        let Some(mut stored) = self.sessions.get_mut(&session.id) else {
            return Ok(None);
        };
        stored.title = session.title.clone();
        stored.format = session.format;
        stored.stream_mode = session.stream_mode;
        stored.start_date = session.start_date;
        stored.end_date = session.end_date;
        stored.published_at = session.published_at;
        stored.max_attendees = session.max_attendees;
        stored.speaker_emails = session.speaker_emails.clone();
        stored.updated_at = session.updated_at;
        Ok(Some(stored.clone()))
    }

    async fn set_live_status(&self, id: Uuid, status: LiveStatus) -> AppResult<bool> {
        Ok(self
            .sessions
            .get_mut(&id)
            .map(|mut s| {
                s.live_status = status;
                s.updated_at = Utc::now();
            })
            .is_some())
    }

    async fn claim_room(
        &self,
        id: Uuid,
        claim: &str,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> AppResult<bool> {
        let Some(mut session) = self.sessions.get_mut(&id) else {
            return Ok(false);
        };
        if session.room_name.is_some() && !session.claim_expired(stale_before) {
            return Ok(false);
        }
        session.room_name = Some(claim.to_string());
        session.room_url = None;
        session.room_claimed_at = Some(now);
        Ok(true)
    }

    async fn set_room(
        &self,
        id: Uuid,
        claim: &str,
        room_name: &str,
        room_url: &str,
    ) -> AppResult<bool> {
        let Some(mut session) = self.sessions.get_mut(&id) else {
            return Ok(false);
        };
        if session.room_name.as_deref() != Some(claim)
            || session.format == SessionFormat::InPerson
        {
            return Ok(false);
        }
        session.room_name = Some(room_name.to_string());
        session.room_url = Some(room_url.to_string());
        session.room_claimed_at = None;
        session.updated_at = Utc::now();
        Ok(true)
    }

    async fn release_claim(&self, id: Uuid, claim: &str) -> AppResult<bool> {
        let Some(mut session) = self.sessions.get_mut(&id) else {
            return Ok(false);
        };
        if session.room_name.as_deref() != Some(claim) {
            return Ok(false);
        }
        session.room_name = None;
        session.room_url = None;
        session.room_claimed_at = None;
        Ok(true)
    }

    async fn clear_room_everywhere(&self, room_name: &str) -> AppResult<u64> {
        let now = Utc::now();
        let mut cleared = 0;
        for mut session in self.sessions.iter_mut() {
            if session.room_name.as_deref() == Some(room_name) {
                session.room_name = None;
                session.room_url = None;
                session.room_claimed_at = None;
                session.updated_at = now;
                cleared += 1;
            }
        }
        Ok(cleared)
    }
}
