//! Room configuration derived from a session.

use chrono::{DateTime, Duration, Utc};

use livehub_core::config::ConferenceConfig;
use livehub_core::types::conference::{RoomCreateRequest, RoomPrivacy, RoomProperties};
use livehub_entity::session::{Session, StreamMode};

/// Build the create-room request for `session`.
///
/// Every room expires after the configured lifetime, has chat and screen
/// share on and knocking off. Livestreams are owner-only with cloud
/// recording; calls are capped at the session's attendee limit.
pub fn room_request(
    session: &Session,
    config: &ConferenceConfig,
    now: DateTime<Utc>,
) -> RoomCreateRequest {
    let mut properties = RoomProperties {
        exp: Some((now + Duration::hours(config.room_expiry_hours)).timestamp()),
        enable_chat: Some(true),
        enable_screenshare: Some(true),
        enable_knocking: Some(false),
        ..Default::default()
    };

    match session.stream_mode {
        StreamMode::Livestream => {
            properties.owner_only_broadcast = Some(true);
            properties.enable_recording = Some("cloud".to_string());
        }
        StreamMode::Call => {
            let cap = session
                .max_attendees
                .and_then(|m| u32::try_from(m).ok())
                .filter(|m| *m > 0)
                .unwrap_or(config.default_max_participants);
            properties.max_participants = Some(cap);
        }
    }

    RoomCreateRequest {
        name: None,
        privacy: RoomPrivacy::Private,
        properties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livehub_entity::session::{CreateSession, SessionFormat};
    use uuid::Uuid;

    fn session(mode: StreamMode, max: Option<i32>) -> Session {
        let now = Utc::now();
        CreateSession {
            event_id: Uuid::new_v4(),
            title: "Talk".into(),
            format: SessionFormat::Virtual,
            stream_mode: mode,
            start_date: now,
            end_date: now + Duration::hours(1),
            published: true,
            max_attendees: max,
            speaker_emails: vec![],
        }
        .into_session(now)
    }

    #[test]
    fn test_common_properties() {
        let now = Utc::now();
        let req = room_request(
            &session(StreamMode::Call, None),
            &ConferenceConfig::default(),
            now,
        );
        let p = &req.properties;
        assert_eq!(p.exp, Some((now + Duration::hours(24)).timestamp()));
        assert_eq!(p.enable_chat, Some(true));
        assert_eq!(p.enable_screenshare, Some(true));
        assert_eq!(p.enable_knocking, Some(false));
    }

    #[test]
    fn test_call_caps_participants() {
        let config = ConferenceConfig::default();
        let now = Utc::now();
        let capped = room_request(&session(StreamMode::Call, Some(120)), &config, now);
        assert_eq!(capped.properties.max_participants, Some(120));
        assert_eq!(capped.properties.owner_only_broadcast, None);

        let default = room_request(&session(StreamMode::Call, None), &config, now);
        assert_eq!(default.properties.max_participants, Some(50));
    }

    #[test]
    fn test_livestream_is_broadcast_with_recording() {
        let req = room_request(
            &session(StreamMode::Livestream, Some(10)),
            &ConferenceConfig::default(),
            Utc::now(),
        );
        assert_eq!(req.properties.owner_only_broadcast, Some(true));
        assert_eq!(req.properties.enable_recording.as_deref(), Some("cloud"));
        assert_eq!(req.properties.max_participants, None);
    }
}
