//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles carried in identity tokens.
///
/// Admin and Moderator are elevated: they control room lifecycle,
/// broadcast and moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Platform administrator.
    Admin,
    /// Event staff running live sessions.
    Moderator,
    /// Regular participant.
    #[default]
    Attendee,
}

impl UserRole {
    /// Whether this role grants live-room control.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Admin | Self::Moderator)
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::Attendee => "attendee",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = livehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "moderator" => Ok(Self::Moderator),
            "attendee" => Ok(Self::Attendee),
            _ => Err(livehub_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, moderator, attendee"
            ))),
        }
    }
}
