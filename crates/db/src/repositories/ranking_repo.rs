//! Read-only aggregate queries behind the ranking endpoints.
//!
//! These queries only produce scored rows in a deterministic order; rank
//! numbers and podium splits are assigned by the calling layer.

use grit_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::ranking::{ChallengeStanding, OverallStanding, WeeklyStanding};

/// Provides the standings queries for weekly, overall and challenge rankings.
pub struct RankingRepo;

impl RankingRepo {
    /// Users with at least one check-in inside the period, scored by count.
    /// Ties are ordered by username so output is stable.
    pub async fn weekly_standings(
        pool: &PgPool,
        period_start: Timestamp,
        period_end: Timestamp,
    ) -> Result<Vec<WeeklyStanding>, sqlx::Error> {
        sqlx::query_as::<_, WeeklyStanding>(
            "SELECT u.id AS user_id, u.username, u.profile_image, u.status, u.points, \
                    COUNT(c.id)::int4 AS score \
             FROM users u \
             JOIN checkins c ON c.user_id = u.id AND c.timestamp BETWEEN $1 AND $2 \
             GROUP BY u.id, u.username, u.profile_image, u.status, u.points \
             ORDER BY score DESC, u.username ASC",
        )
        .bind(period_start)
        .bind(period_end)
        .fetch_all(pool)
        .await
    }

    /// Every user ordered by weeks won, then ledger points, then username.
    pub async fn overall_standings(pool: &PgPool) -> Result<Vec<OverallStanding>, sqlx::Error> {
        sqlx::query_as::<_, OverallStanding>(
            "SELECT id AS user_id, username, profile_image, status, points, weeks_won \
             FROM users \
             ORDER BY weeks_won DESC, points DESC, username ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Approved members of a challenge scored by their check-in count inside
    /// the period. Members without check-ins appear with a zero score.
    pub async fn challenge_weekly_standings(
        pool: &PgPool,
        challenge_id: DbId,
        period_start: Timestamp,
        period_end: Timestamp,
    ) -> Result<Vec<ChallengeStanding>, sqlx::Error> {
        sqlx::query_as::<_, ChallengeStanding>(
            "SELECT p.user_id, u.username, u.profile_image, p.progress, p.challenge_points, \
                    COUNT(c.id)::int4 AS score \
             FROM challenge_participants p \
             JOIN users u ON u.id = p.user_id \
             LEFT JOIN checkins c ON c.user_id = p.user_id \
                 AND c.challenge_id = p.challenge_id \
                 AND c.timestamp BETWEEN $2 AND $3 \
             WHERE p.challenge_id = $1 AND p.approved = TRUE \
             GROUP BY p.user_id, u.username, u.profile_image, p.progress, p.challenge_points \
             ORDER BY score DESC, u.username ASC",
        )
        .bind(challenge_id)
        .bind(period_start)
        .bind(period_end)
        .fetch_all(pool)
        .await
    }

    /// Approved members of a challenge scored by total progress.
    pub async fn challenge_overall_standings(
        pool: &PgPool,
        challenge_id: DbId,
    ) -> Result<Vec<ChallengeStanding>, sqlx::Error> {
        sqlx::query_as::<_, ChallengeStanding>(
            "SELECT p.user_id, u.username, u.profile_image, p.progress, p.challenge_points, \
                    p.progress AS score \
             FROM challenge_participants p \
             JOIN users u ON u.id = p.user_id \
             WHERE p.challenge_id = $1 AND p.approved = TRUE \
             ORDER BY score DESC, u.username ASC",
        )
        .bind(challenge_id)
        .fetch_all(pool)
        .await
    }
}
