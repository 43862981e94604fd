//! Integration tests for the ledger repositories: weekly points, challenge
//! points, the closure fence, and the materialized columns on `users`.

use chrono::{TimeZone, Utc};
use grit_core::period::Period;
use grit_core::types::Timestamp;
use grit_db::models::user::{CreateUser, User};
use grit_db::repositories::{
    ChallengePointsRepo, CheckInRepo, UserRepo, WeeklyPointsRepo, WeeklyUpdateRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: "argon2-hash".to_string(),
            is_admin: false,
        },
    )
    .await
    .unwrap()
}

/// The week of Sunday 2025-01-12.
fn week() -> Period {
    Period::containing(Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap())
}

async fn add_checkins(pool: &PgPool, user_id: i64, times: &[Timestamp]) {
    let mut tx = pool.begin().await.unwrap();
    for ts in times {
        CheckInRepo::create(&mut tx, user_id, None, *ts, None, None)
            .await
            .unwrap();
    }
    tx.commit().await.unwrap();
}

// ---------------------------------------------------------------------------
// Test: weekly_points upsert is keyed on (user, week)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_weekly_upsert_overwrites_same_week(pool: PgPool) {
    let user = create_user(&pool, "ana").await;
    let week = week();

    let mut tx = pool.begin().await.unwrap();
    let first = WeeklyPointsRepo::upsert(&mut tx, user.id, week.start, week.end, 3, 10)
        .await
        .unwrap();
    let second = WeeklyPointsRepo::upsert(&mut tx, user.id, week.start, week.end, 5, 16)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(first.id, second.id, "Same (user, week) must hit the same row");
    assert_eq!(second.checkin_count, 5);
    assert_eq!(second.points, 16);

    let rows = WeeklyPointsRepo::list_for_user(&pool, user.id).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_weekly_rows_distinct_across_weeks(pool: PgPool) {
    let user = create_user(&pool, "bruno").await;
    let week = week();
    let next = week.next();

    let mut tx = pool.begin().await.unwrap();
    WeeklyPointsRepo::upsert(&mut tx, user.id, week.start, week.end, 3, 10)
        .await
        .unwrap();
    WeeklyPointsRepo::upsert(&mut tx, user.id, next.start, next.end, 4, 13)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let rows = WeeklyPointsRepo::list_for_user(&pool, user.id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].week_start, week.start, "Oldest week first");
    assert_eq!(rows[1].week_start, next.start);
}

// ---------------------------------------------------------------------------
// Test: users.points mirrors the weekly ledger
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_points_sums_ledger(pool: PgPool) {
    let user = create_user(&pool, "carla").await;
    let week = week();

    let mut tx = pool.begin().await.unwrap();
    WeeklyPointsRepo::upsert(&mut tx, user.id, week.start, week.end, 3, 10)
        .await
        .unwrap();
    let prev = week.prev();
    WeeklyPointsRepo::upsert(&mut tx, user.id, prev.start, prev.end, 5, 16)
        .await
        .unwrap();
    let total = UserRepo::refresh_points(&mut tx, user.id).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(total, 26);
    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.points, 26);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_all_points_covers_users_without_rows(pool: PgPool) {
    let scored = create_user(&pool, "dora").await;
    let blank = create_user(&pool, "eli").await;
    let week = week();

    // Give the blank user a stale materialized total, then rebuild.
    sqlx::query("UPDATE users SET points = 99 WHERE id = $1")
        .bind(blank.id)
        .execute(&pool)
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    WeeklyPointsRepo::upsert(&mut tx, scored.id, week.start, week.end, 4, 13)
        .await
        .unwrap();
    UserRepo::reset_all_points_from_ledger(&mut tx).await.unwrap();
    tx.commit().await.unwrap();

    let scored = UserRepo::find_by_id(&pool, scored.id).await.unwrap().unwrap();
    let blank = UserRepo::find_by_id(&pool, blank.id).await.unwrap().unwrap();
    assert_eq!(scored.points, 13);
    assert_eq!(blank.points, 0, "No ledger rows means zero points");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_credit_week_won_increments(pool: PgPool) {
    let user = create_user(&pool, "fabi").await;

    let mut tx = pool.begin().await.unwrap();
    UserRepo::credit_week_won(&mut tx, user.id).await.unwrap();
    UserRepo::credit_week_won(&mut tx, user.id).await.unwrap();
    tx.commit().await.unwrap();

    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.weeks_won, 2);
}

// ---------------------------------------------------------------------------
// Test: status refresh reads the current week's ledger row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_all_statuses(pool: PgPool) {
    let active = create_user(&pool, "gil").await;
    let idle = create_user(&pool, "hugo").await;
    let week = week();

    let mut tx = pool.begin().await.unwrap();
    WeeklyPointsRepo::upsert(&mut tx, active.id, week.start, week.end, 3, 10)
        .await
        .unwrap();
    WeeklyPointsRepo::upsert(&mut tx, idle.id, week.start, week.end, 1, 0)
        .await
        .unwrap();
    UserRepo::refresh_all_statuses(&mut tx, week.start, 3).await.unwrap();
    tx.commit().await.unwrap();

    let active = UserRepo::find_by_id(&pool, active.id).await.unwrap().unwrap();
    let idle = UserRepo::find_by_id(&pool, idle.id).await.unwrap().unwrap();
    assert_eq!(active.status, "on_track");
    assert_eq!(idle.status, "normal");
}

// ---------------------------------------------------------------------------
// Test: closure fence admits exactly one claimant per week
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_closure_fence_single_claim(pool: PgPool) {
    let week = week();

    let mut tx = pool.begin().await.unwrap();
    let claimed = WeeklyUpdateRepo::try_insert(&mut tx, week.start, week.end)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    assert!(claimed, "First claim should win");

    let mut tx = pool.begin().await.unwrap();
    let reclaimed = WeeklyUpdateRepo::try_insert(&mut tx, week.start, week.end)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    assert!(!reclaimed, "Second claim for the same week should lose");

    let markers = WeeklyUpdateRepo::list(&pool).await.unwrap();
    assert_eq!(markers.len(), 1, "Exactly one marker row for the week");
    assert_eq!(markers[0].week_start, week.start);
}

// ---------------------------------------------------------------------------
// Test: challenge_points ledger sum and clear
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_challenge_points_sum_and_clear(pool: PgPool) {
    let user = create_user(&pool, "iris").await;
    let challenge_id: i64 = sqlx::query_scalar(
        "INSERT INTO challenges \
             (title, modality, target, duration_days, start_date, end_date, code, created_by) \
         VALUES ('Sum', 'run', 10, 30, NOW(), NOW() + INTERVAL '30 days', 'SUMCODE1', $1) \
         RETURNING id",
    )
    .bind(user.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    let week = week();
    let next = week.next();

    let mut tx = pool.begin().await.unwrap();
    ChallengePointsRepo::upsert(&mut tx, challenge_id, user.id, week.start, week.end, 2, 10)
        .await
        .unwrap();
    ChallengePointsRepo::upsert(&mut tx, challenge_id, user.id, next.start, next.end, 4, 20)
        .await
        .unwrap();
    let sum = ChallengePointsRepo::sum_for_member(&mut tx, challenge_id, user.id)
        .await
        .unwrap();
    assert_eq!(sum, 30);

    ChallengePointsRepo::clear_for_challenge(&mut tx, challenge_id)
        .await
        .unwrap();
    let sum = ChallengePointsRepo::sum_for_member(&mut tx, challenge_id, user.id)
        .await
        .unwrap();
    assert_eq!(sum, 0, "Cleared ledger sums to zero");
    tx.commit().await.unwrap();
}

// ---------------------------------------------------------------------------
// Test: period counting is boundary-inclusive
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_count_in_period_includes_boundaries(pool: PgPool) {
    let user = create_user(&pool, "jose").await;
    let week = week();

    add_checkins(
        &pool,
        user.id,
        &[
            week.start,
            week.end,
            week.start + chrono::Duration::days(2),
            // Just outside on both sides.
            week.start - chrono::Duration::microseconds(1),
            week.end + chrono::Duration::microseconds(1),
        ],
    )
    .await;

    let mut tx = pool.begin().await.unwrap();
    let count = CheckInRepo::count_in_period(&mut tx, user.id, week.start, week.end)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    assert_eq!(count, 3, "Both boundary instants count, neighbours do not");
}

// ---------------------------------------------------------------------------
// Test: weekly winners query applies the minimum
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_users_meeting_minimum(pool: PgPool) {
    let winner = create_user(&pool, "kaya").await;
    let loser = create_user(&pool, "lena").await;
    let week = week();
    let day = chrono::Duration::days(1);

    add_checkins(
        &pool,
        winner.id,
        &[week.start, week.start + day, week.start + day * 2],
    )
    .await;
    add_checkins(&pool, loser.id, &[week.start, week.start + day]).await;

    let mut tx = pool.begin().await.unwrap();
    let winners = CheckInRepo::users_meeting_minimum(&mut tx, week.start, week.end, 3)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(winners, vec![winner.id]);
}
