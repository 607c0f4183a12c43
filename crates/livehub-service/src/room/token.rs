//! Meeting-token issuance.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use livehub_core::config::ConferenceConfig;
use livehub_core::error::AppError;
use livehub_core::traits::ConferenceProvider;
use livehub_core::types::conference::{MeetingTokenProperties, MeetingTokenRequest};
use livehub_database::store::SessionStore;
use livehub_entity::session::{Session, StreamMode};

use crate::context::RequestContext;

/// A token granting entry to a session's room.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub room_name: String,
    pub room_url: String,
    pub is_owner: bool,
    pub expires_at: DateTime<Utc>,
}

/// Issues provider meeting tokens.
///
/// Never creates rooms or writes to the session: a session without a
/// room is reported back to the caller.
#[derive(Debug, Clone)]
pub struct MeetingTokenService {
    sessions: Arc<dyn SessionStore>,
    provider: Arc<dyn ConferenceProvider>,
    config: ConferenceConfig,
}

impl MeetingTokenService {
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

    /// Issue a token for `session_id`. Anonymous callers are allowed and
    /// are never owners.
    pub async fn issue(
        &self,
        ctx: &RequestContext,
        session_id: Uuid,
        user_name: Option<&str>,
    ) -> Result<IssuedToken, AppError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))?;

        let (room_name, room_url) = match (session.active_room(), session.active_room_url()) {
            (Some(name), Some(url)) => (name.to_string(), url.to_string()),
            _ => return Err(AppError::validation("Session has no live room yet")),
        };

        let principal = ctx.principal.as_ref();
        let is_owner =
            principal.is_some_and(|p| p.is_elevated() || session.is_speaker(&p.email));
        let expires_at = ctx.request_time + Duration::hours(self.config.token_expiry_hours);
        let display_name = user_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| principal.map(|p| p.display_name().to_string()));

        let request = MeetingTokenRequest {
            properties: token_properties(
                &session,
                &room_name,
                is_owner,
                display_name,
                principal.map(|p| p.user_id),
                expires_at,
            ),
        };
        let token = self.provider.create_meeting_token(&request).await?;

        info!(
            session_id = %session_id,
            user_id = ?ctx.user_id(),
            client = %ctx.client,
            is_owner,
            "Meeting token issued"
        );

        Ok(IssuedToken {
            token: token.token,
            room_name,
            room_url,
            is_owner,
            expires_at,
        })
    }
}

fn token_properties(
    session: &Session,
    room_name: &str,
    is_owner: bool,
    user_name: Option<String>,
    user_id: Option<Uuid>,
    expires_at: DateTime<Utc>,
) -> MeetingTokenProperties {
    let mut properties = MeetingTokenProperties {
        room_name: room_name.to_string(),
        is_owner,
        exp: expires_at.timestamp(),
        user_name,
        user_id: user_id.map(|id| id.to_string()),
        enable_screenshare: None,
        start_video_off: None,
        start_audio_off: None,
    };

    // Livestream viewers only receive.
    if session.stream_mode == StreamMode::Livestream && !is_owner {
        properties.enable_screenshare = Some(false);
        properties.start_video_off = Some(true);
        properties.start_audio_off = Some(true);
    }
    properties
}
