//! Session change events.

use serde::{Deserialize, Serialize};

use super::model::Session;

/// Published after a session content write commits.
///
/// `previous` is `None` for a newly created session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionChanged {
    pub previous: Option<Session>,
    pub current: Session,
}

impl SessionChanged {
    pub fn created(current: Session) -> Self {
        Self {
            previous: None,
            current,
        }
    }

    pub fn updated(previous: Session, current: Session) -> Self {
        Self {
            previous: Some(previous),
            current,
        }
    }
}
