//! Weekly (global) points ledger.
//!
//! Each `(user, week)` pair owns one ledger row holding the check-in count
//! and the points it earns. A user's `points` column is never written
//! directly: it is always refreshed from the sum of their ledger rows, so
//! re-aggregating a period after any mutation keeps the total consistent.

use std::collections::BTreeMap;

use grit_core::period::Period;
use grit_core::scoring::{weekly_points, ScoringConfig};
use grit_core::types::{DbId, Timestamp};
use grit_core::user::status_for_count;
use grit_db::models::points::WeeklyPoints;
use grit_db::repositories::{CheckInRepo, UserRepo, WeeklyPointsRepo};
use serde::Serialize;

use crate::error::AppResult;

/// Re-aggregate one user's ledger row for one period from the check-ins
/// actually stored in that window.
///
/// The caller must already hold the user's row lock
/// ([`UserRepo::lock_for_ledger`]), which serializes concurrent ledger
/// mutations for the same user.
///
/// Also refreshes the user's `points` total and, when `period` is the one
/// containing `now`, their weekly status. Editing an old week deliberately
/// leaves the status alone: status tracks the current period only.
pub async fn apply_period(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    scoring: &ScoringConfig,
    user_id: DbId,
    period: Period,
    now: Timestamp,
) -> AppResult<WeeklyPoints> {
    let count = CheckInRepo::count_in_period(tx, user_id, period.start, period.end).await?;
    let points = weekly_points(count, scoring.min_training_days);

    let row =
        WeeklyPointsRepo::upsert(tx, user_id, period.start, period.end, count, points).await?;

    UserRepo::refresh_points(tx, user_id).await?;

    if period == Period::containing(now) {
        let status = status_for_count(count, scoring.min_training_days);
        UserRepo::set_status(tx, user_id, status).await?;
    }

    Ok(row)
}

/// Outcome of a full ledger rebuild, reported back to the admin caller.
#[derive(Debug, Serialize)]
pub struct RebuildSummary {
    /// Total check-ins scanned.
    pub checkins_scanned: usize,
    /// Ledger rows written (one per user-week with at least one check-in).
    pub rows_written: usize,
}

/// Rebuild the entire weekly ledger from scratch inside one transaction.
///
/// Clears every ledger row, rescans all check-ins grouped by user and week,
/// rewrites the ledger, then resets every user's `points` total and weekly
/// status from the rebuilt rows. All-or-nothing: any failure rolls the whole
/// rebuild back.
pub async fn rebuild_all(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    scoring: &ScoringConfig,
    now: Timestamp,
) -> AppResult<RebuildSummary> {
    WeeklyPointsRepo::clear_all(tx).await?;

    let checkins = CheckInRepo::scan_all_ordered(tx).await?;

    // Group by (user, week start). BTreeMap keeps writes in a stable order.
    let mut counts: BTreeMap<(DbId, Timestamp), i32> = BTreeMap::new();
    for checkin in &checkins {
        let period = Period::containing(checkin.timestamp);
        *counts.entry((checkin.user_id, period.start)).or_insert(0) += 1;
    }

    for (&(user_id, week_start), &count) in &counts {
        let period = Period::starting_at(week_start);
        let points = weekly_points(count, scoring.min_training_days);
        WeeklyPointsRepo::upsert(tx, user_id, period.start, period.end, count, points).await?;
    }

    UserRepo::reset_all_points_from_ledger(tx).await?;

    let current_week_start = Period::containing(now).start;
    UserRepo::refresh_all_statuses(tx, current_week_start, scoring.min_training_days).await?;

    Ok(RebuildSummary {
        checkins_scanned: checkins.len(),
        rows_written: counts.len(),
    })
}
