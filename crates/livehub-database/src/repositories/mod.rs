//! PostgreSQL implementations of the store traits.

pub mod action;
pub mod attendance;
pub mod chat;
pub mod entitlement;
pub mod session;

pub use action::ActionRepository;
pub use attendance::AttendanceRepository;
pub use chat::ChatRepository;
pub use entitlement::EntitlementRepository;
pub use session::SessionRepository;
