//! Credential primitives for the minimal auth collaborator.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access tokens carrying the caller's id and role, plus
//!   refresh-token helpers.

pub mod jwt;
pub mod password;
