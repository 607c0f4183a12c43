//! Custom Axum extractors.

pub mod auth;
pub mod client;
pub mod validated;

pub use auth::{AuthUser, MaybeAuthUser};
pub use client::ClientIdentity;
pub use validated::ValidatedJson;
