//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::format::{LiveStatus, SessionFormat, StreamMode};

/// Reserved `room_name` prefix marking a room creation in flight.
pub const ROOM_CLAIM_PREFIX: &str = "claim:";

/// A scheduled session of an event.
///
/// A published virtual or hybrid session is served through at most one
/// provider room. While that room is being created, `room_name` holds a
/// creation claim (see [`ROOM_CLAIM_PREFIX`]) that is never exposed as a
/// real room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The event this session belongs to.
    pub event_id: Uuid,
    /// Display title.
    pub title: String,
    /// Attendance format.
    pub format: SessionFormat,
    /// Room media mode.
    pub stream_mode: StreamMode,
    /// Scheduled start.
    pub start_date: DateTime<Utc>,
    /// Scheduled end.
    pub end_date: DateTime<Utc>,
    /// Publication time; `None` while the session is a draft.
    pub published_at: Option<DateTime<Utc>>,
    /// Provider room name, or a creation claim.
    pub room_name: Option<String>,
    /// Provider room join URL.
    pub room_url: Option<String>,
    /// When the current creation claim was taken.
    #[serde(default, skip_serializing)]
    pub room_claimed_at: Option<DateTime<Utc>>,
    /// Moderator override of the schedule-derived status.
    pub live_status: LiveStatus,
    /// Participant cap for call-mode rooms.
    pub max_attendees: Option<i32>,
    /// Emails of the speakers; matched case-insensitively.
    pub speaker_emails: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has been published.
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }

    /// The real room name, hiding creation claims.
    pub fn active_room(&self) -> Option<&str> {
        self.room_name
            .as_deref()
            .filter(|name| !name.starts_with(ROOM_CLAIM_PREFIX))
    }

    /// The join URL of the real room, if any.
    pub fn active_room_url(&self) -> Option<&str> {
        self.active_room().and(self.room_url.as_deref())
    }

    /// Whether a room creation claim is currently held.
    pub fn has_room_claim(&self) -> bool {
        self.room_name
            .as_deref()
            .is_some_and(|name| name.starts_with(ROOM_CLAIM_PREFIX))
    }

    /// A claim taken before `stale_before`, or of unknown age, whose
    /// creator is presumed gone.
    pub fn claim_expired(&self, stale_before: DateTime<Utc>) -> bool {
        self.has_room_claim()
            && self
                .room_claimed_at
                .is_none_or(|claimed_at| claimed_at < stale_before)
    }

    /// Published remote session without a room or claim.
    pub fn needs_room(&self) -> bool {
        self.format.needs_room() && self.is_published() && self.room_name.is_none()
    }

    /// In-person session still linked to a real room.
    pub fn has_stale_room(&self) -> bool {
        self.format == SessionFormat::InPerson && self.active_room().is_some()
    }

    /// Case-insensitive membership in the speaker list.
    pub fn is_speaker(&self, email: &str) -> bool {
        let email = email.trim();
        !email.is_empty()
            && self
                .speaker_emails
                .iter()
                .any(|s| s.trim().eq_ignore_ascii_case(email))
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    pub event_id: Uuid,
    pub title: String,
    pub format: SessionFormat,
    #[serde(default)]
    pub stream_mode: StreamMode,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Publish immediately.
    #[serde(default)]
    pub published: bool,
    pub max_attendees: Option<i32>,
    #[serde(default)]
    pub speaker_emails: Vec<String>,
}

impl CreateSession {
    /// Build the row to insert. Room fields always start empty.
    pub fn into_session(self, now: DateTime<Utc>) -> Session {
        Session {
            id: Uuid::new_v4(),
            event_id: self.event_id,
            title: self.title,
            format: self.format,
            stream_mode: self.stream_mode,
            start_date: self.start_date,
            end_date: self.end_date,
            published_at: self.published.then_some(now),
            room_name: None,
            room_url: None,
            room_claimed_at: None,
            live_status: LiveStatus::Idle,
            max_attendees: self.max_attendees,
            speaker_emails: self.speaker_emails,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a session's content fields.
///
/// Room fields and the live-status override are not writable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSession {
    pub title: Option<String>,
    pub format: Option<SessionFormat>,
    pub stream_mode: Option<StreamMode>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// `true` publishes (keeping an earlier publish time), `false` unpublishes.
    pub published: Option<bool>,
    pub max_attendees: Option<i32>,
    pub speaker_emails: Option<Vec<String>>,
}

impl UpdateSession {
    /// Apply the update to a copy of `session`.
    pub fn apply(self, session: &Session, now: DateTime<Utc>) -> Session {
        let mut next = session.clone();
        if let Some(title) = self.title {
            next.title = title;
        }
        if let Some(format) = self.format {
            next.format = format;
        }
        if let Some(mode) = self.stream_mode {
            next.stream_mode = mode;
        }
        if let Some(start) = self.start_date {
            next.start_date = start;
        }
        if let Some(end) = self.end_date {
            next.end_date = end;
        }
        match self.published {
            Some(true) => next.published_at = next.published_at.or(Some(now)),
            Some(false) => next.published_at = None,
            None => {}
        }
        if let Some(max) = self.max_attendees {
            next.max_attendees = Some(max);
        }
        if let Some(emails) = self.speaker_emails {
            next.speaker_emails = emails;
        }
        next.updated_at = now;
        next
    }
}
