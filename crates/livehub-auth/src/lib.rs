//! # livehub-auth
//!
//! Verification of identity-provider tokens and role checks for LiveHub.
//! Tokens are issued elsewhere; this crate only decodes them into a
//! [`Principal`].
//!
//! ## Modules
//!
//! - `jwt`: HS256 claims and verification
//! - `principal`: the authenticated caller
//! - `rbac`: elevated-role enforcement

pub mod jwt;
pub mod principal;
pub mod rbac;

pub use jwt::{Claims, JwtDecoder};
pub use principal::Principal;
pub use rbac::RbacEnforcer;
