//! # livehub-api
//!
//! HTTP API layer for LiveHub built on Axum.
//!
//! Provides the REST endpoints for rooms, meeting tokens, live actions,
//! chat, attendance, entitlements and sessions, together with middleware
//! (rate limiting, CORS, logging), extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
