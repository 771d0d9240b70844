use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// Nothing access-related is cached here: gate state, locks, and progress are
/// re-read from the database on every request.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: coursegate_db::DbPool,
    /// Server configuration (JWT settings are read by the auth extractors).
    pub config: Arc<ServerConfig>,
}
