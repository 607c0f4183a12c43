//! Session domain entities.

pub mod event;
pub mod format;
pub mod model;

pub use event::SessionChanged;
pub use format::{LiveStatus, SessionFormat, StreamMode};
pub use model::{CreateSession, ROOM_CLAIM_PREFIX, Session, UpdateSession};
