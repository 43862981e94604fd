//! Repository for the `challenge_points` ledger table.

use grit_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::points::ChallengePoints;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, challenge_id, user_id, period_start, period_end, checkin_count, \
                        points, created_at, updated_at";

/// Provides ledger row maintenance for per-challenge points.
pub struct ChallengePointsRepo;

impl ChallengePointsRepo {
    /// Atomically insert or overwrite the ledger row for
    /// `(challenge_id, user_id, period_start)`.
    pub async fn upsert(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        challenge_id: DbId,
        user_id: DbId,
        period_start: Timestamp,
        period_end: Timestamp,
        checkin_count: i32,
        points: i32,
    ) -> Result<ChallengePoints, sqlx::Error> {
        let query = format!(
            "INSERT INTO challenge_points \
                 (challenge_id, user_id, period_start, period_end, checkin_count, points) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (challenge_id, user_id, period_start) DO UPDATE SET \
                 period_end = EXCLUDED.period_end, \
                 checkin_count = EXCLUDED.checkin_count, \
                 points = EXCLUDED.points \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChallengePoints>(&query)
            .bind(challenge_id)
            .bind(user_id)
            .bind(period_start)
            .bind(period_end)
            .bind(checkin_count)
            .bind(points)
            .fetch_one(&mut **tx)
            .await
    }

    /// Sum of a member's points across all periods of one challenge.
    pub async fn sum_for_member(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        challenge_id: DbId,
        user_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(points)::int4, 0) FROM challenge_points \
             WHERE challenge_id = $1 AND user_id = $2",
        )
        .bind(challenge_id)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// All ledger rows for one member of one challenge, oldest period first.
    pub async fn list_for_member(
        pool: &PgPool,
        challenge_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<ChallengePoints>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM challenge_points \
             WHERE challenge_id = $1 AND user_id = $2 \
             ORDER BY period_start ASC"
        );
        sqlx::query_as::<_, ChallengePoints>(&query)
            .bind(challenge_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Drop every ledger row for one challenge (challenge rebuild).
    pub async fn clear_for_challenge(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        challenge_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM challenge_points WHERE challenge_id = $1")
            .bind(challenge_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Drop the entire ledger (global rebuild).
    pub async fn clear_all(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM challenge_points")
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
