//! # livehub-database
//!
//! Store contracts for every LiveHub entity, with PostgreSQL repository
//! implementations, process-local in-memory implementations, and the
//! session change-event bus.

pub mod connection;
pub mod events;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod stores;

pub use connection::DatabasePool;
pub use events::SessionEventBus;
pub use store::{ActionStore, AttendanceStore, ChatStore, EntitlementStore, SessionStore};
pub use stores::Stores;
