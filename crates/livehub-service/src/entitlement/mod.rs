//! Access grants to events and sessions.

pub mod service;

pub use service::{EntitlementService, GrantRequest, Granted};
