//! Handlers for the `/admin` resource.
//!
//! All endpoints require the admin flag via [`RequireAdmin`]. The
//! recalculation endpoints are the recovery tool for ledger drift: they
//! rebuild everything from the check-ins actually stored, atomically.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use grit_db::models::user::UserResponse;
use grit_db::repositories::UserRepo;

use crate::engine::challenge_ledger::{self, ChallengeRebuildSummary};
use crate::engine::closure::{self, ClosureOutcome};
use crate::engine::ledger::{self, RebuildSummary};
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/users
///
/// Every registered user, newest first.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/v1/admin/recalculate/weekly
///
/// Rebuild the entire weekly ledger from stored check-ins in one
/// transaction, then reset every user's points total and status from it.
pub async fn recalculate_weekly(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<RebuildSummary>>> {
    let mut tx = state.pool.begin().await?;
    let summary = ledger::rebuild_all(&mut tx, &state.config.scoring, Utc::now()).await?;
    tx.commit().await?;

    tracing::info!(
        admin_id = admin.user_id,
        checkins_scanned = summary.checkins_scanned,
        rows_written = summary.rows_written,
        "Weekly ledger rebuilt"
    );

    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/admin/recalculate/challenges
///
/// Rebuild every challenge's ledger, member progress, and totals in one
/// transaction.
pub async fn recalculate_challenges(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ChallengeRebuildSummary>>> {
    let mut tx = state.pool.begin().await?;
    let summary = challenge_ledger::rebuild_all(&mut tx, &state.config.scoring).await?;
    tx.commit().await?;

    tracing::info!(
        admin_id = admin.user_id,
        challenges = summary.challenges,
        rows_written = summary.rows_written,
        "Challenge ledgers rebuilt"
    );

    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/admin/closure/run
///
/// Run the weekly closure sweep on demand. Same routine the background job
/// runs; harmless to trigger while it is scheduled.
pub async fn run_closure(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ClosureOutcome>>> {
    let outcome = closure::run(&state.pool, &state.config.scoring, Utc::now()).await?;

    tracing::info!(
        admin_id = admin.user_id,
        closed = outcome.closed,
        skipped = outcome.skipped,
        "Closure sweep triggered"
    );

    Ok(Json(DataResponse { data: outcome }))
}
