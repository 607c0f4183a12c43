//! Session format, stream mode and live-status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a session is attended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_format", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SessionFormat {
    /// Online only.
    Virtual,
    /// On site with an online room.
    Hybrid,
    /// On site only. Never holds a room.
    InPerson,
}

impl SessionFormat {
    /// Whether sessions of this format are served through a video room.
    pub fn needs_room(&self) -> bool {
        matches!(self, Self::Virtual | Self::Hybrid)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Virtual => "virtual",
            Self::Hybrid => "hybrid",
            Self::InPerson => "in_person",
        }
    }
}

impl fmt::Display for SessionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Room media mode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "stream_mode", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StreamMode {
    /// Everyone may send audio and video.
    #[default]
    Call,
    /// Broadcast: only owners send media, everyone else watches.
    Livestream,
}

/// Moderator-set override of the time-derived session status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "live_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LiveStatus {
    /// No override; status follows the schedule.
    #[default]
    Idle,
    /// Forced live.
    Live,
    /// Forced over.
    Ended,
}

impl LiveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Live => "live",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for LiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LiveStatus {
    type Err = livehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(Self::Idle),
            "live" => Ok(Self::Live),
            "ended" => Ok(Self::Ended),
            _ => Err(livehub_core::AppError::validation(format!(
                "Invalid live status: '{s}'. Expected one of: idle, live, ended"
            ))),
        }
    }
}
