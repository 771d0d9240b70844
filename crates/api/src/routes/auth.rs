//! Route definitions for the stand-in identity endpoints.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Credential payloads are a few hundred bytes at most.
const AUTH_BODY_LIMIT: usize = 4 * 1024;

/// Routes mounted at `/auth`. Only `logout` needs a bearer token.
///
/// ```text
/// POST /login    -> login
/// POST /refresh  -> refresh (spends the presented refresh token)
/// POST /logout   -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .layer(DefaultBodyLimit::max(AUTH_BODY_LIMIT))
}
