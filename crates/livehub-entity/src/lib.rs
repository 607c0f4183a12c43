//! # livehub-entity
//!
//! Domain entity models for LiveHub. Every struct in this crate represents
//! a database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database entities
//! additionally derive `sqlx::FromRow`.

pub mod action;
pub mod attendance;
pub mod chat;
pub mod entitlement;
pub mod session;
pub mod user;
