//! Handlers for the `/checkins` resource.
//!
//! All mutations delegate to [`crate::engine::checkins`], which owns the
//! ledger re-aggregation; the handlers only resolve ownership.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use grit_core::error::CoreError;
use grit_core::types::DbId;
use grit_db::models::checkin::{CheckIn, CreateCheckIn, UpdateCheckIn};
use grit_db::repositories::CheckInRepo;

use crate::engine::checkins;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/checkins
///
/// Record a check-in for the authenticated user. Optionally tagged with a
/// challenge the user is an approved participant of.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCheckIn>,
) -> AppResult<(StatusCode, Json<DataResponse<CheckIn>>)> {
    let checkin = checkins::record(&state, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: checkin })))
}

/// PUT /api/v1/checkins/{id}
///
/// Update a check-in. Only the owner or an admin may edit.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(checkin_id): Path<DbId>,
    Json(input): Json<UpdateCheckIn>,
) -> AppResult<Json<DataResponse<CheckIn>>> {
    let existing = find_owned(&state, &auth, checkin_id).await?;
    let updated = checkins::update(&state, existing, &input).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/checkins/{id}
///
/// Delete a check-in. Only the owner or an admin may delete. Returns 204.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(checkin_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = find_owned(&state, &auth, checkin_id).await?;
    checkins::remove(&state, existing).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a check-in and verify the caller may mutate it.
async fn find_owned(state: &AppState, auth: &AuthUser, checkin_id: DbId) -> AppResult<CheckIn> {
    let checkin = CheckInRepo::find_by_id(&state.pool, checkin_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CheckIn",
            id: checkin_id,
        }))?;

    if checkin.user_id != auth.user_id && !auth.is_admin {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only modify your own check-ins".into(),
        )));
    }

    Ok(checkin)
}
