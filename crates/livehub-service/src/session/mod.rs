//! Session content writes and status resolution.

pub mod content;
pub mod status;

pub use content::{SessionContentService, StatusReport};
pub use status::{SessionStatus, StatusPolicy, refresh_hint, resolve_status};
