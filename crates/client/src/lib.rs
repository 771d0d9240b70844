//! HTTP client for the course access API.
//!
//! [`api::CourseGateApi`] is a thin typed wrapper over the REST routes.
//! [`gate::EnrollmentGate`] holds the caller's last observed gate state for
//! one course and forgets it whenever the caller changes anything.

pub mod api;
pub mod gate;

pub use api::{ClientError, CourseGateApi};
pub use gate::EnrollmentGate;
