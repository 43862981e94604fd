//! Check-in orchestration: create, update, and delete.
//!
//! Every mutation follows the same shape: lock the owner's user row, apply
//! the write, then re-aggregate every ledger period the write touched, all
//! inside one transaction wrapped in [`with_retry`].

use chrono::Utc;
use grit_core::challenge::ensure_in_window;
use grit_core::error::CoreError;
use grit_core::period::Period;
use grit_core::scoring::ChallengeScoring;
use grit_core::types::{DbId, Timestamp};
use grit_db::models::challenge::Challenge;
use grit_db::models::checkin::{CheckIn, CreateCheckIn, UpdateCheckIn};
use grit_db::repositories::{ChallengeRepo, CheckInRepo, ParticipantRepo, UserRepo};

use crate::engine::{challenge_ledger, ledger, retry::with_retry};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Resolved challenge membership for a challenge-tagged check-in.
struct ChallengeContext {
    challenge: Challenge,
    participant_id: DbId,
    rules: Option<ChallengeScoring>,
}

/// Check that `user_id` may record a check-in against `challenge_id` at `ts`.
///
/// Requires an approved participant row and a timestamp inside the challenge
/// window.
async fn resolve_membership(
    state: &AppState,
    challenge_id: DbId,
    user_id: DbId,
    ts: Timestamp,
) -> AppResult<ChallengeContext> {
    let challenge = ChallengeRepo::find_by_id(&state.pool, challenge_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Challenge",
            id: challenge_id,
        }))?;

    let participant = ParticipantRepo::find(&state.pool, challenge_id, user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "Not a participant of this challenge".to_string(),
            ))
        })?;
    if !participant.approved {
        return Err(AppError::Core(CoreError::Forbidden(
            "Participation not yet approved".to_string(),
        )));
    }

    ensure_in_window(challenge.start_date, challenge.end_date, ts)?;

    let rules = ChallengeRepo::find_rules(&state.pool, challenge_id)
        .await?
        .map(|r| r.scoring());

    Ok(ChallengeContext {
        challenge,
        participant_id: participant.id,
        rules,
    })
}

/// Record a new check-in and update every ledger it lands in.
pub async fn record(
    state: &AppState,
    user_id: DbId,
    input: &CreateCheckIn,
) -> AppResult<CheckIn> {
    let timestamp = input.timestamp.unwrap_or_else(Utc::now);
    let now = Utc::now();

    let ctx = match input.challenge_id {
        Some(challenge_id) => {
            Some(resolve_membership(state, challenge_id, user_id, timestamp).await?)
        }
        None => None,
    };

    with_retry("record_checkin", || {
        record_once(state, user_id, input, timestamp, now, ctx.as_ref())
    })
    .await
}

async fn record_once(
    state: &AppState,
    user_id: DbId,
    input: &CreateCheckIn,
    timestamp: Timestamp,
    now: Timestamp,
    ctx: Option<&ChallengeContext>,
) -> AppResult<CheckIn> {
    let scoring = &state.config.scoring;
    let mut tx = state.pool.begin().await?;

    UserRepo::lock_for_ledger(&mut tx, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    // Re-check membership under the lock; it may have vanished since the
    // pre-flight read.
    if let Some(ctx) = ctx {
        ParticipantRepo::lock_member(&mut tx, ctx.challenge.id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Forbidden(
                    "Not a participant of this challenge".to_string(),
                ))
            })?;
    }

    let checkin = CheckInRepo::create(
        &mut tx,
        user_id,
        input.challenge_id,
        timestamp,
        input.duration,
        input.description.as_deref(),
    )
    .await?;

    let period = Period::containing(timestamp);
    ledger::apply_period(&mut tx, scoring, user_id, period, now).await?;

    if let Some(ctx) = ctx {
        ParticipantRepo::increment_progress(&mut tx, ctx.participant_id, 1).await?;
        challenge_ledger::apply_period(
            &mut tx,
            scoring,
            ctx.challenge.id,
            user_id,
            period,
            ctx.rules.as_ref(),
        )
        .await?;
        challenge_ledger::refresh_member_totals(
            &mut tx,
            ctx.challenge.id,
            ctx.participant_id,
            user_id,
        )
        .await?;
    }

    tx.commit().await?;
    Ok(checkin)
}

/// Update an existing check-in, re-aggregating both the old and new periods
/// when the timestamp moves across a week boundary.
///
/// A challenge-tagged check-in stays tagged; the new timestamp must still
/// fall inside the challenge window.
pub async fn update(
    state: &AppState,
    existing: CheckIn,
    input: &UpdateCheckIn,
) -> AppResult<CheckIn> {
    let new_timestamp = input.timestamp.unwrap_or(existing.timestamp);
    let duration = input.duration.or(existing.duration);
    let description = input.description.clone().or_else(|| existing.description.clone());
    let now = Utc::now();

    let ctx = match existing.challenge_id {
        Some(challenge_id) => {
            Some(resolve_membership(state, challenge_id, existing.user_id, new_timestamp).await?)
        }
        None => None,
    };

    with_retry("update_checkin", || {
        update_once(
            state,
            &existing,
            new_timestamp,
            duration,
            description.as_deref(),
            now,
            ctx.as_ref(),
        )
    })
    .await
}

async fn update_once(
    state: &AppState,
    existing: &CheckIn,
    new_timestamp: Timestamp,
    duration: Option<f64>,
    description: Option<&str>,
    now: Timestamp,
    ctx: Option<&ChallengeContext>,
) -> AppResult<CheckIn> {
    let scoring = &state.config.scoring;
    let mut tx = state.pool.begin().await?;

    UserRepo::lock_for_ledger(&mut tx, existing.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: existing.user_id,
        }))?;

    if let Some(ctx) = ctx {
        ParticipantRepo::lock_member(&mut tx, ctx.challenge.id, existing.user_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Forbidden(
                    "Not a participant of this challenge".to_string(),
                ))
            })?;
    }

    let updated =
        CheckInRepo::update(&mut tx, existing.id, new_timestamp, duration, description).await?;

    let old_period = Period::containing(existing.timestamp);
    let new_period = Period::containing(new_timestamp);

    ledger::apply_period(&mut tx, scoring, existing.user_id, old_period, now).await?;
    if new_period != old_period {
        ledger::apply_period(&mut tx, scoring, existing.user_id, new_period, now).await?;
    }

    if let Some(ctx) = ctx {
        challenge_ledger::apply_period(
            &mut tx,
            scoring,
            ctx.challenge.id,
            existing.user_id,
            old_period,
            ctx.rules.as_ref(),
        )
        .await?;
        if new_period != old_period {
            challenge_ledger::apply_period(
                &mut tx,
                scoring,
                ctx.challenge.id,
                existing.user_id,
                new_period,
                ctx.rules.as_ref(),
            )
            .await?;
        }
        // Progress is a count of tagged check-ins, which an edit never changes.
        challenge_ledger::refresh_member_totals(
            &mut tx,
            ctx.challenge.id,
            ctx.participant_id,
            existing.user_id,
        )
        .await?;
    }

    tx.commit().await?;
    Ok(updated)
}

/// Delete a check-in and re-aggregate the period it came out of.
///
/// Works even after the challenge window has closed, and tolerates a missing
/// participant row; only the ledgers that still have owners are touched.
pub async fn remove(state: &AppState, existing: CheckIn) -> AppResult<()> {
    let now = Utc::now();

    let rules = match existing.challenge_id {
        Some(challenge_id) => ChallengeRepo::find_rules(&state.pool, challenge_id)
            .await?
            .map(|r| r.scoring()),
        None => None,
    };

    with_retry("delete_checkin", || {
        remove_once(state, &existing, now, rules.as_ref())
    })
    .await
}

async fn remove_once(
    state: &AppState,
    existing: &CheckIn,
    now: Timestamp,
    rules: Option<&ChallengeScoring>,
) -> AppResult<()> {
    let scoring = &state.config.scoring;
    let mut tx = state.pool.begin().await?;

    UserRepo::lock_for_ledger(&mut tx, existing.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: existing.user_id,
        }))?;

    let member = match existing.challenge_id {
        Some(challenge_id) => {
            ParticipantRepo::lock_member(&mut tx, challenge_id, existing.user_id).await?
        }
        None => None,
    };

    let deleted = CheckInRepo::delete(&mut tx, existing.id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CheckIn",
            id: existing.id,
        }));
    }

    let period = Period::containing(existing.timestamp);
    ledger::apply_period(&mut tx, scoring, existing.user_id, period, now).await?;

    if let Some(challenge_id) = existing.challenge_id {
        challenge_ledger::apply_period(
            &mut tx,
            scoring,
            challenge_id,
            existing.user_id,
            period,
            rules,
        )
        .await?;

        if let Some(member) = member {
            // Recount rather than decrement; the clamp on increment could
            // otherwise hide drift.
            let progress =
                CheckInRepo::count_for_challenge_member(&mut tx, challenge_id, existing.user_id)
                    .await?;
            ParticipantRepo::set_progress(&mut tx, member.id, progress).await?;
            challenge_ledger::refresh_member_totals(
                &mut tx,
                challenge_id,
                member.id,
                existing.user_id,
            )
            .await?;
        }
    }

    tx.commit().await?;
    Ok(())
}
