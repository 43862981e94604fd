//! Handlers for the `/rankings` resource.
//!
//! Both rankings are public: they only expose usernames, statuses, and
//! scores that the leaderboard is meant to show.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use grit_core::period::Period;
use grit_db::models::ranking::{OverallStanding, WeeklyStanding};
use grit_db::repositories::RankingRepo;

use crate::engine::ranking::{podium_ranking, PodiumRanking};
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/rankings/weekly
///
/// The current week's leaderboard: everyone with at least one check-in this
/// week, ranked by check-in count, with ties sharing the podium.
pub async fn weekly(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PodiumRanking<WeeklyStanding>>>> {
    let period = Period::containing(Utc::now());
    let rows = RankingRepo::weekly_standings(&state.pool, period.start, period.end).await?;

    Ok(Json(DataResponse {
        data: podium_ranking(rows, |row| row.score),
    }))
}

/// GET /api/v1/rankings/overall
///
/// The all-time standings ordered by weeks won. Display order only; no
/// podium split.
pub async fn overall(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<OverallStanding>>>> {
    let rows = RankingRepo::overall_standings(&state.pool).await?;
    Ok(Json(DataResponse { data: rows }))
}
