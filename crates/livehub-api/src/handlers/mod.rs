//! HTTP request handlers, grouped by domain.

pub mod attendance;
pub mod chat;
pub mod entitlement;
pub mod health;
pub mod live;
pub mod room;
pub mod session;
