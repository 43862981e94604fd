//! End-of-week closure.
//!
//! Once a week has fully elapsed it is closed exactly once: a marker row is
//! inserted for the week, and every user who met the weekly minimum gets a
//! win credited. Closure never touches `points`; those flow exclusively
//! through the weekly ledger sum. It only credits `weeks_won`.

use grit_core::period::Period;
use grit_core::scoring::ScoringConfig;
use grit_core::types::Timestamp;
use grit_db::repositories::{CheckInRepo, UserRepo, WeeklyUpdateRepo};
use grit_db::DbPool;
use serde::Serialize;

use crate::error::AppResult;

/// Outcome of one closure sweep.
#[derive(Debug, Serialize)]
pub struct ClosureOutcome {
    /// Weeks closed by this sweep.
    pub closed: usize,
    /// Weeks that were already closed.
    pub skipped: usize,
}

/// Close every completed week, from the week of the earliest check-in up to
/// (but not including) the week containing `now`.
///
/// Safe to run repeatedly and concurrently: each week closes at most once.
pub async fn run(
    pool: &DbPool,
    scoring: &ScoringConfig,
    now: Timestamp,
) -> AppResult<ClosureOutcome> {
    let mut outcome = ClosureOutcome {
        closed: 0,
        skipped: 0,
    };

    let Some(earliest) = CheckInRepo::earliest_timestamp(pool).await? else {
        return Ok(outcome);
    };

    let current_start = Period::containing(now).start;
    let mut period = Period::containing(earliest);

    while period.start < current_start {
        match close_period(pool, scoring, period).await? {
            Some(winners) => {
                outcome.closed += 1;
                tracing::info!(week_start = %period.start, winners, "Closed week");
            }
            None => outcome.skipped += 1,
        }
        period = period.next();
    }

    Ok(outcome)
}

/// Close a single week. Returns the number of winners, or `None` if the week
/// was already closed.
///
/// The marker insert comes first and doubles as the idempotency fence: of
/// two concurrent closers, only the one whose insert lands proceeds to
/// credit wins.
async fn close_period(
    pool: &DbPool,
    scoring: &ScoringConfig,
    period: Period,
) -> AppResult<Option<usize>> {
    let mut tx = pool.begin().await?;

    if !WeeklyUpdateRepo::try_insert(&mut tx, period.start, period.end).await? {
        tx.rollback().await?;
        return Ok(None);
    }

    let winners = CheckInRepo::users_meeting_minimum(
        &mut tx,
        period.start,
        period.end,
        scoring.min_training_days,
    )
    .await?;
    for &user_id in &winners {
        UserRepo::credit_week_won(&mut tx, user_id).await?;
    }

    tx.commit().await?;
    Ok(Some(winners.len()))
}
