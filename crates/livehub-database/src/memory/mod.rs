//! Process-local store implementations.
//!
//! Used for single-node deployments and tests. Nothing survives a restart
//! and nothing is shared between processes.

pub mod action;
pub mod attendance;
pub mod chat;
pub mod entitlement;
pub mod session;

pub use action::MemoryActionStore;
pub use attendance::MemoryAttendanceStore;
pub use chat::MemoryChatStore;
pub use entitlement::MemoryEntitlementStore;
pub use session::MemorySessionStore;
