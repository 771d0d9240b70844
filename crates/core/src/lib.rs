//! Domain logic for course access gating.
//!
//! The `core` crate contains no database dependencies. Everything here is
//! evaluated against pre-loaded data passed in by the caller, so the same
//! rules drive the HTTP handlers, the client, and the tests.

pub mod enrollment;
pub mod error;
pub mod gate;
pub mod guard;
pub mod progress;
pub mod roles;
pub mod sequencing;
pub mod types;
