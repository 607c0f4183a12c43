//! # livehub-service
//!
//! Business logic service layer for LiveHub. Each service orchestrates the
//! stores and the conferencing provider to implement one group of
//! live-session use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod entitlement;
pub mod live;
pub mod room;
pub mod session;

pub use context::RequestContext;
pub use entitlement::EntitlementService;
pub use live::{ActionService, AttendanceService, ChatService};
pub use room::{MeetingTokenService, RoomLifecycle};
pub use session::{SessionContentService, StatusPolicy};
