//! Entitlement (access grant) entities.

pub mod model;

pub use model::{AccessCheck, CreateEntitlement, Entitlement, EntitlementSource};
