//! Repository for weekly closure markers.
//!
//! A row in `weekly_updates` records that one week has been closed and its
//! winners credited. The unique constraint on `week_start` is what makes
//! closure idempotent under concurrent runs.

use grit_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::points::WeeklyUpdate;

const COLUMNS: &str = "id, week_start, week_end, processed_at, created_at, updated_at";

/// Provides closure-marker persistence.
pub struct WeeklyUpdateRepo;

impl WeeklyUpdateRepo {
    /// Attempt to claim a week for closure. Returns `true` if this caller
    /// inserted the marker and therefore owns the closure of that week;
    /// `false` if another run already claimed it.
    pub async fn try_insert(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        week_start: Timestamp,
        week_end: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO weekly_updates (week_start, week_end) VALUES ($1, $2) \
             ON CONFLICT (week_start) DO NOTHING",
        )
        .bind(week_start)
        .bind(week_end)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// All closure markers, oldest week first.
    pub async fn list(pool: &PgPool) -> Result<Vec<WeeklyUpdate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM weekly_updates ORDER BY week_start ASC");
        sqlx::query_as::<_, WeeklyUpdate>(&query).fetch_all(pool).await
    }
}
