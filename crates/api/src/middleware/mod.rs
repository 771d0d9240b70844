//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller from a JWT Bearer token; rejects with 401.
//! - [`auth::MaybeAuthUser`] -- same, but an absent or invalid credential is
//!   `None` instead of a rejection (used by the gate endpoint).
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.

pub mod auth;
pub mod rbac;
