//! Point ledger entity models: weekly points, challenge points, and the
//! closure marker.

use grit_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `weekly_points` ledger, unique per `(user_id, week_start)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WeeklyPoints {
    pub id: DbId,
    pub user_id: DbId,
    pub week_start: Timestamp,
    pub week_end: Timestamp,
    pub checkin_count: i32,
    pub points: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `challenge_points` ledger, unique per
/// `(challenge_id, user_id, period_start)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChallengePoints {
    pub id: DbId,
    pub challenge_id: DbId,
    pub user_id: DbId,
    pub period_start: Timestamp,
    pub period_end: Timestamp,
    pub checkin_count: i32,
    pub points: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A closure marker row: its existence means the week was already credited.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WeeklyUpdate {
    pub id: DbId,
    pub week_start: Timestamp,
    pub week_end: Timestamp,
    pub processed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
