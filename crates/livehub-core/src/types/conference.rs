//! Wire types exchanged with the conferencing provider.

use serde::{Deserialize, Serialize};

/// Who may enter a room without a meeting token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomPrivacy {
    /// Anyone with the URL may join.
    Public,
    /// A meeting token is required.
    #[default]
    Private,
}

/// Room configuration sent on create and update.
///
/// Unset fields are omitted from the request body so an update only touches
/// what the caller supplied. Keys the provider supports but this type does
/// not model are carried through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomProperties {
    /// Expiry as a Unix timestamp in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_chat: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_screenshare: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_knocking: Option<bool>,
    /// Only owners may send media (livestream / broadcast mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_only_broadcast: Option<bool>,
    /// Recording mode, e.g. `"cloud"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_recording: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    /// Provider-specific properties passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of a room creation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomCreateRequest {
    /// Explicit room name; the provider generates one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub privacy: RoomPrivacy,
    pub properties: RoomProperties,
}

/// A room as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRoom {
    /// Unique room name.
    pub name: String,
    /// Join URL.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<String>,
    /// Effective room configuration echoed back by the provider.
    #[serde(default)]
    pub config: serde_json::Value,
}

/// Outcome of a room deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomDeletion {
    /// The provider removed the room.
    Deleted,
    /// The provider did not know the room (404).
    AlreadyGone,
}

/// Capabilities encoded in a meeting token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingTokenProperties {
    pub room_name: String,
    pub is_owner: bool,
    /// Expiry as a Unix timestamp in seconds.
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_screenshare: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_video_off: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_audio_off: Option<bool>,
}

/// Body of a meeting-token call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingTokenRequest {
    pub properties: MeetingTokenProperties,
}

/// A minted meeting token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingToken {
    pub token: String,
}
