//! Whitelisted live action kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every action type a moderator may push into a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Poll,
    Announcement,
    Download,
    ChatMute,
    ChatUnmute,
    ChatDelete,
    ChatDisabled,
    RecordingStarted,
    RecordingStopped,
    SessionStatus,
    HandRaise,
    Promote,
    Demote,
    Reaction,
}

impl ActionKind {
    /// All kinds, in wire-name order of the whitelist.
    pub const ALL: [ActionKind; 14] = [
        Self::Poll,
        Self::Announcement,
        Self::Download,
        Self::ChatMute,
        Self::ChatUnmute,
        Self::ChatDelete,
        Self::ChatDisabled,
        Self::RecordingStarted,
        Self::RecordingStopped,
        Self::SessionStatus,
        Self::HandRaise,
        Self::Promote,
        Self::Demote,
        Self::Reaction,
    ];

    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poll => "poll",
            Self::Announcement => "announcement",
            Self::Download => "download",
            Self::ChatMute => "chat-mute",
            Self::ChatUnmute => "chat-unmute",
            Self::ChatDelete => "chat-delete",
            Self::ChatDisabled => "chat-disabled",
            Self::RecordingStarted => "recording-started",
            Self::RecordingStopped => "recording-stopped",
            Self::SessionStatus => "session-status",
            Self::HandRaise => "hand-raise",
            Self::Promote => "promote",
            Self::Demote => "demote",
            Self::Reaction => "reaction",
        }
    }

    /// Look up a kind by its exact wire name.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Payload fields that must be present and non-null.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Poll => &["question", "options"],
            Self::Announcement => &["message"],
            Self::Download => &["url", "filename"],
            Self::ChatDelete => &["messageId"],
            Self::SessionStatus => &["status"],
            Self::Promote | Self::Demote => &["userId"],
            Self::Reaction => &["emoji"],
            Self::ChatMute
            | Self::ChatUnmute
            | Self::ChatDisabled
            | Self::RecordingStarted
            | Self::RecordingStopped
            | Self::HandRaise => &[],
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip_through_serde() {
        for kind in ActionKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.as_str());
            assert_eq!(ActionKind::from_wire(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_from_wire_is_exact() {
        assert_eq!(ActionKind::from_wire("Poll"), None);
        assert_eq!(ActionKind::from_wire("kick"), None);
    }
}
