//! Handler for the enrollment gate (`refreshGate`).

use axum::extract::{Path, State};
use axum::Json;
use coursegate_core::error::CoreError;
use coursegate_core::gate::{GateState, GateView};
use coursegate_core::types::DbId;

use super::access::{find_visible_course, read_gate};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/courses/{course_id}/gate
///
/// Re-derive the caller's gate state. Read-only and idempotent.
///
/// An absent or invalid credential yields `UNAUTHORIZED` rather than an HTTP
/// error, and any infrastructure failure yields `ERROR`. A course the caller
/// cannot see is still a 404.
pub async fn refresh_gate(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<GateView>>> {
    let Some(user) = user else {
        return Ok(Json(DataResponse {
            data: GateState::Unauthorized.into(),
        }));
    };
    let viewer = user.viewer();

    let gate = match find_visible_course(&state.pool, &viewer, course_id).await {
        Ok(_) => read_gate(&state.pool, &viewer, course_id).await,
        Err(err) => Err(err),
    };

    let gate = match gate {
        Ok(gate) => gate,
        Err(AppError::Core(err @ CoreError::NotFound { .. })) => return Err(err.into()),
        Err(err) => {
            tracing::error!(
                user_id = viewer.user_id,
                course_id,
                error = %err,
                "Gate refresh failed"
            );
            GateState::Error
        }
    };

    Ok(Json(DataResponse { data: gate.into() }))
}
