pub mod access;
pub mod admin;
pub mod auth;
pub mod enrollment;
pub mod gate;
pub mod lessons;
pub mod progress;
