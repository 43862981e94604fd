//! Handlers for the `/users` resource (profile, check-in history).

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use grit_core::error::CoreError;
use grit_core::period::Period;
use grit_core::scoring::weekly_points;
use grit_core::types::{DbId, Timestamp};
use grit_core::user::validate_username;
use grit_db::models::checkin::CheckIn;
use grit_db::models::user::{UpdateUser, UserResponse};
use grit_db::repositories::{CheckInRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /users/{id}/checkins`.
#[derive(Debug, Deserialize)]
pub struct CheckinHistoryQuery {
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Query parameters for `GET /users/{id}/checkins/week`.
#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    /// Week to summarize, relative to the current one: `0` (default) is the
    /// current week, `-1` the previous, and so on.
    pub week_offset: Option<i64>,
}

/// Maximum page size for check-in history.
const MAX_LIMIT: i64 = 100;

/// Default page size for check-in history.
const DEFAULT_LIMIT: i64 = 50;

/// One week of a user's activity.
#[derive(Debug, Serialize)]
pub struct WeekSummary {
    pub period_start: Timestamp,
    pub period_end: Timestamp,
    pub checkin_count: i32,
    /// Points the week is worth under the weekly formula.
    pub points: i32,
    pub checkins: Vec<CheckIn>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
///
/// The authenticated user's own profile.
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/users/me
///
/// Update the authenticated user's profile. Returns 409 if the new username
/// is taken.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(ref username) = input.username {
        validate_username(username)?;
    }

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// GET /api/v1/users/{id}/checkins
///
/// A user's check-in history, newest first. Visible to any authenticated
/// user.
pub async fn list_checkins(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<CheckinHistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<CheckIn>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    ensure_user_exists(&state, user_id).await?;

    let checkins = CheckInRepo::list_by_user(&state.pool, user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: checkins }))
}

/// GET /api/v1/users/{id}/checkins/week
///
/// Summarize one week of a user's activity: the check-ins, their count, and
/// the points the week is worth. `week_offset` selects past weeks.
pub async fn week_summary(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<WeekQuery>,
) -> AppResult<Json<DataResponse<WeekSummary>>> {
    let week_offset = params.week_offset.unwrap_or(0);
    if week_offset > 0 {
        return Err(AppError::BadRequest(
            "week_offset must be zero or negative".into(),
        ));
    }

    ensure_user_exists(&state, user_id).await?;

    let period = Period::containing(Utc::now()).offset(week_offset);
    let checkins =
        CheckInRepo::list_by_user_between(&state.pool, user_id, period.start, period.end).await?;

    let checkin_count = checkins.len() as i32;
    let points = weekly_points(checkin_count, state.config.scoring.min_training_days);

    Ok(Json(DataResponse {
        data: WeekSummary {
            period_start: period.start,
            period_end: period.end,
            checkin_count,
            points,
            checkins,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_user_exists(state: &AppState, user_id: DbId) -> AppResult<()> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;
    Ok(())
}
