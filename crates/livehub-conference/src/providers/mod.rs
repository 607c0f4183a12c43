//! Conferencing provider implementations.

pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
