//! # livehub-core
//!
//! Core crate for LiveHub. Contains configuration schemas, the unified
//! error system, and the conferencing provider contract consumed by the
//! room lifecycle and live broadcast services.
//!
//! This crate has **no** internal dependencies on other LiveHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
