//! The authenticated caller.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use livehub_entity::user::UserRole;

use crate::jwt::Claims;

/// Identity and role of a verified caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
}

impl Principal {
    /// Admin or moderator.
    pub fn is_elevated(&self) -> bool {
        self.role.is_elevated()
    }

    /// Name to show in rooms, falling back to the email.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }
    }
}
