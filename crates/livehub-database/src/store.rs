//! Store traits implemented by the PostgreSQL repositories and the
//! in-memory backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use livehub_core::result::AppResult;
use livehub_entity::action::ActionRecord;
use livehub_entity::attendance::AttendanceRecord;
use livehub_entity::chat::ChatMessage;
use livehub_entity::entitlement::Entitlement;
use livehub_entity::session::{LiveStatus, Session};

/// Persistence for sessions and their room link.
///
/// Room fields are only ever written through the claim protocol:
/// [`claim_room`](Self::claim_room) moves `room_name` from NULL (or from an
/// expired claim) to a claim marker atomically, and only the holder of that
/// marker may replace it with a real room or release it.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>>;

    async fn insert(&self, session: &Session) -> AppResult<Session>;

    /// Write content fields. Room fields and `live_status` are left as stored.
    async fn update_content(&self, session: &Session) -> AppResult<Option<Session>>;

    async fn set_live_status(&self, id: Uuid, status: LiveStatus) -> AppResult<bool>;

    /// Set `room_name` to `claim`, stamped `now`, if it is NULL or holds a
    /// claim taken before `stale_before`.
    async fn claim_room(
        &self,
        id: Uuid,
        claim: &str,
        now: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Replace `claim` with the created room. False if the claim was lost
    /// or the session has become in-person meanwhile.
    async fn set_room(
        &self,
        id: Uuid,
        claim: &str,
        room_name: &str,
        room_url: &str,
    ) -> AppResult<bool>;

    /// Drop `claim` back to NULL so the next qualifying update retries.
    async fn release_claim(&self, id: Uuid, claim: &str) -> AppResult<bool>;

    /// Clear the room link on every session referencing `room_name`.
    async fn clear_room_everywhere(&self, room_name: &str) -> AppResult<u64>;
}

/// Append-only action log.
#[async_trait]
pub trait ActionStore: Send + Sync + std::fmt::Debug + 'static {
    async fn append(&self, record: &ActionRecord) -> AppResult<ActionRecord>;

    /// Actions of a session, oldest first.
    async fn list_by_session(&self, session_id: Uuid) -> AppResult<Vec<ActionRecord>>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Chat log keyed by the client message id.
#[async_trait]
pub trait ChatStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert unless `message_id` is already stored. Returns the stored
    /// message and whether this call inserted it.
    async fn insert_if_absent(&self, message: &ChatMessage) -> AppResult<(ChatMessage, bool)>;

    /// Messages of a session, oldest first.
    async fn list_by_session(&self, session_id: Uuid) -> AppResult<Vec<ChatMessage>>;

    async fn delete_by_message_id(&self, message_id: &str) -> AppResult<bool>;
}

/// Join/leave log.
#[async_trait]
pub trait AttendanceStore: Send + Sync + std::fmt::Debug + 'static {
    async fn insert(&self, record: &AttendanceRecord) -> AppResult<AttendanceRecord>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AttendanceRecord>>;

    /// Set `left_at` if still open. Returns the record, or `None` if unknown.
    async fn close(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<Option<AttendanceRecord>>;

    /// Close every record opened before `cutoff` and still open, flagging
    /// them `auto_closed`. Returns how many were closed.
    async fn close_stale(&self, cutoff: DateTime<Utc>, at: DateTime<Utc>) -> AppResult<u64>;
}

/// Access grants.
#[async_trait]
pub trait EntitlementStore: Send + Sync + std::fmt::Debug + 'static {
    /// Grant for exactly (user, session), optionally also matching the event.
    async fn find_for_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        event_id: Option<Uuid>,
    ) -> AppResult<Option<Entitlement>>;

    /// Event-wide grant (no session) for (user, event).
    async fn find_event_wide(&self, user_id: Uuid, event_id: Uuid)
    -> AppResult<Option<Entitlement>>;

    /// Insert unless the (user, event, session) scope already exists.
    /// Returns the stored grant and whether this call inserted it.
    async fn insert_if_absent(&self, entitlement: &Entitlement) -> AppResult<(Entitlement, bool)>;
}
