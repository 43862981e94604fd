//! Aggregate row shapes produced by the ranking queries.

use grit_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// One user's standing in the current week: check-in count plus the display
/// fields the ranking endpoints return.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WeeklyStanding {
    pub user_id: DbId,
    pub username: String,
    pub profile_image: Option<String>,
    pub status: String,
    pub points: i32,
    /// Check-in count within the ranked period.
    pub score: i32,
}

/// One user's cumulative standing across all closed weeks.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OverallStanding {
    pub user_id: DbId,
    pub username: String,
    pub profile_image: Option<String>,
    pub status: String,
    pub points: i32,
    pub weeks_won: i32,
}

/// One approved participant's standing within a challenge.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChallengeStanding {
    pub user_id: DbId,
    pub username: String,
    pub profile_image: Option<String>,
    pub progress: i32,
    pub challenge_points: i32,
    /// Period check-in count for weekly rankings, `progress` for overall.
    pub score: i32,
}
