//! Repository for the `weekly_points` ledger table.
//!
//! Rows here are owned by the ledger engine: recomputed from check-ins,
//! never hand-edited.

use grit_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::points::WeeklyPoints;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, week_start, week_end, checkin_count, points, created_at, updated_at";

/// Provides ledger row maintenance for weekly points.
pub struct WeeklyPointsRepo;

impl WeeklyPointsRepo {
    /// Atomically insert or overwrite the ledger row for `(user_id,
    /// week_start)` with a freshly derived count and score.
    pub async fn upsert(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
        week_start: Timestamp,
        week_end: Timestamp,
        checkin_count: i32,
        points: i32,
    ) -> Result<WeeklyPoints, sqlx::Error> {
        let query = format!(
            "INSERT INTO weekly_points (user_id, week_start, week_end, checkin_count, points) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, week_start) DO UPDATE SET \
                 week_end = EXCLUDED.week_end, \
                 checkin_count = EXCLUDED.checkin_count, \
                 points = EXCLUDED.points \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WeeklyPoints>(&query)
            .bind(user_id)
            .bind(week_start)
            .bind(week_end)
            .bind(checkin_count)
            .bind(points)
            .fetch_one(&mut **tx)
            .await
    }

    /// The ledger row for one `(user_id, week_start)` key, if present.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        week_start: Timestamp,
    ) -> Result<Option<WeeklyPoints>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM weekly_points WHERE user_id = $1 AND week_start = $2"
        );
        sqlx::query_as::<_, WeeklyPoints>(&query)
            .bind(user_id)
            .bind(week_start)
            .fetch_optional(pool)
            .await
    }

    /// All ledger rows for a user, oldest week first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<WeeklyPoints>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM weekly_points WHERE user_id = $1 ORDER BY week_start ASC"
        );
        sqlx::query_as::<_, WeeklyPoints>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Drop every ledger row (start of a full rebuild).
    pub async fn clear_all(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM weekly_points")
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
