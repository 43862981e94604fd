//! Per-challenge points ledger and member progress.
//!
//! Challenge points mirror the weekly ledger's shape: one row per
//! `(challenge, member, period)`, scored by the challenge's own rules (or the
//! flat default rate when it has none). A participant's `challenge_points`
//! column is always the sum of their rows, and `progress` is always the count
//! of their check-ins tagged with the challenge.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use grit_core::error::CoreError;
use grit_core::period::Period;
use grit_core::scoring::{challenge_points, ChallengeScoring, ScoringConfig};
use grit_core::types::{DbId, Timestamp};
use grit_db::models::points::ChallengePoints;
use grit_db::repositories::{
    ChallengePointsRepo, ChallengeRepo, CheckInRepo, ParticipantRepo, UserRepo,
};
use serde::Serialize;

use crate::engine::{ledger, retry::with_retry};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Re-aggregate one member's challenge ledger row for one period.
///
/// Does not touch the participant's totals; call
/// [`refresh_member_totals`] afterwards in the same transaction.
pub async fn apply_period(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    scoring: &ScoringConfig,
    challenge_id: DbId,
    user_id: DbId,
    period: Period,
    rules: Option<&ChallengeScoring>,
) -> AppResult<ChallengePoints> {
    let count = CheckInRepo::count_in_period_for_challenge(
        tx,
        challenge_id,
        user_id,
        period.start,
        period.end,
    )
    .await?;
    let points = challenge_points(count, rules, scoring.default_challenge_rate);

    let row = ChallengePointsRepo::upsert(
        tx,
        challenge_id,
        user_id,
        period.start,
        period.end,
        count,
        points,
    )
    .await?;

    Ok(row)
}

/// Refresh a participant's `challenge_points` total from their ledger rows.
///
/// Returns the new total.
pub async fn refresh_member_totals(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    challenge_id: DbId,
    participant_id: DbId,
    user_id: DbId,
) -> AppResult<i32> {
    let total = ChallengePointsRepo::sum_for_member(tx, challenge_id, user_id).await?;
    ParticipantRepo::set_challenge_points(tx, participant_id, total).await?;
    Ok(total)
}

/// Rebuild one challenge's ledger and member totals from its check-ins.
///
/// Returns the number of ledger rows written.
async fn rebuild_challenge(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    scoring: &ScoringConfig,
    challenge_id: DbId,
    rules: Option<&ChallengeScoring>,
) -> AppResult<usize> {
    ChallengePointsRepo::clear_for_challenge(tx, challenge_id).await?;

    let checkins = CheckInRepo::scan_challenge_ordered(tx, challenge_id).await?;

    let mut counts: BTreeMap<(DbId, Timestamp), i32> = BTreeMap::new();
    for checkin in &checkins {
        let period = Period::containing(checkin.timestamp);
        *counts.entry((checkin.user_id, period.start)).or_insert(0) += 1;
    }

    for (&(user_id, period_start), &count) in &counts {
        let period = Period::starting_at(period_start);
        let points = challenge_points(count, rules, scoring.default_challenge_rate);
        ChallengePointsRepo::upsert(
            tx,
            challenge_id,
            user_id,
            period.start,
            period.end,
            count,
            points,
        )
        .await?;
    }

    for member in ParticipantRepo::list_members(tx, challenge_id).await? {
        let progress =
            CheckInRepo::count_for_challenge_member(tx, challenge_id, member.user_id).await?;
        ParticipantRepo::set_progress(tx, member.id, progress).await?;

        let total = ChallengePointsRepo::sum_for_member(tx, challenge_id, member.user_id).await?;
        ParticipantRepo::set_challenge_points(tx, member.id, total).await?;
    }

    Ok(counts.len())
}

/// Outcome of a global challenge-ledger rebuild.
#[derive(Debug, Serialize)]
pub struct ChallengeRebuildSummary {
    /// Challenges rebuilt.
    pub challenges: usize,
    /// Ledger rows written across all challenges.
    pub rows_written: usize,
}

/// Rebuild every challenge's ledger inside one transaction.
///
/// All-or-nothing, same as the weekly rebuild.
pub async fn rebuild_all(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    scoring: &ScoringConfig,
) -> AppResult<ChallengeRebuildSummary> {
    ChallengePointsRepo::clear_all(tx).await?;

    let rules_by_challenge: HashMap<DbId, ChallengeScoring> = ChallengeRepo::list_rules(tx)
        .await?
        .into_iter()
        .map(|rules| (rules.challenge_id, rules.scoring()))
        .collect();

    let ids = ChallengeRepo::list_ids(tx).await?;
    let mut rows_written = 0;
    for &challenge_id in &ids {
        rows_written +=
            rebuild_challenge(tx, scoring, challenge_id, rules_by_challenge.get(&challenge_id))
                .await?;
    }

    Ok(ChallengeRebuildSummary {
        challenges: ids.len(),
        rows_written,
    })
}

/// Delete a challenge and repair the weekly ledger it leaves behind.
///
/// Check-ins tagged with the challenge are removed by the foreign-key
/// cascade, which silently changes the weekly counts of every affected
/// `(user, week)` pair. Those pairs are re-aggregated in the same
/// transaction so the weekly ledger never goes stale.
pub async fn remove_challenge(state: &AppState, challenge_id: DbId) -> AppResult<()> {
    let now = chrono::Utc::now();
    with_retry("delete_challenge", || {
        remove_challenge_once(state, challenge_id, now)
    })
    .await
}

async fn remove_challenge_once(
    state: &AppState,
    challenge_id: DbId,
    now: Timestamp,
) -> AppResult<()> {
    let scoring = &state.config.scoring;
    let mut tx = state.pool.begin().await?;

    // Collect the (user, week) pairs whose counts change when the tagged
    // check-ins go away with the challenge.
    let tagged = CheckInRepo::scan_challenge_ordered(&mut tx, challenge_id).await?;
    let mut affected_users: BTreeSet<DbId> = BTreeSet::new();
    let mut affected_weeks: BTreeSet<(DbId, Timestamp)> = BTreeSet::new();
    for checkin in &tagged {
        affected_users.insert(checkin.user_id);
        affected_weeks.insert((checkin.user_id, Period::containing(checkin.timestamp).start));
    }

    // Lock affected users in id order, matching the single-user paths.
    for &user_id in &affected_users {
        UserRepo::lock_for_ledger(&mut tx, user_id).await?;
    }

    let deleted = ChallengeRepo::delete(&mut tx, challenge_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Challenge",
            id: challenge_id,
        }));
    }

    for &(user_id, week_start) in &affected_weeks {
        ledger::apply_period(&mut tx, scoring, user_id, Period::starting_at(week_start), now)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}
