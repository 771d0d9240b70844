//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod course_repo;
pub mod enrollment_repo;
pub mod lesson_repo;
pub mod order_repo;
pub mod progress_repo;
pub mod session_repo;
pub mod user_repo;

pub use course_repo::CourseRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use lesson_repo::LessonRepo;
pub use order_repo::{EnrollOutcome, OrderRepo};
pub use progress_repo::ProgressRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
