//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts where this service writes the table

pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod order;
pub mod progress;
pub mod session;
pub mod user;
