//! Room lifecycle and meeting-token issuance.

pub mod lifecycle;
pub mod properties;
pub mod token;

pub use lifecycle::{RoomLifecycle, RoomLink};
pub use properties::room_request;
pub use token::{IssuedToken, MeetingTokenService};
