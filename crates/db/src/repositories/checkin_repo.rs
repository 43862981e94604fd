//! Repository for the `checkins` table.
//!
//! Mutations run inside engine transactions so the ledgers can re-aggregate
//! the affected periods atomically with the row change.

use grit_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::checkin::CheckIn;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, challenge_id, timestamp, duration, description, created_at, updated_at";

/// Provides CRUD and aggregation queries for check-ins.
pub struct CheckInRepo;

impl CheckInRepo {
    /// Insert a check-in within an engine transaction.
    pub async fn create(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
        challenge_id: Option<DbId>,
        timestamp: Timestamp,
        duration: Option<f64>,
        description: Option<&str>,
    ) -> Result<CheckIn, sqlx::Error> {
        let query = format!(
            "INSERT INTO checkins (user_id, challenge_id, timestamp, duration, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CheckIn>(&query)
            .bind(user_id)
            .bind(challenge_id)
            .bind(timestamp)
            .bind(duration)
            .bind(description)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a check-in by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CheckIn>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM checkins WHERE id = $1");
        sqlx::query_as::<_, CheckIn>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the mutable fields of a check-in within an engine
    /// transaction. The caller passes fully resolved values.
    pub async fn update(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        timestamp: Timestamp,
        duration: Option<f64>,
        description: Option<&str>,
    ) -> Result<CheckIn, sqlx::Error> {
        let query = format!(
            "UPDATE checkins SET timestamp = $2, duration = $3, description = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CheckIn>(&query)
            .bind(id)
            .bind(timestamp)
            .bind(duration)
            .bind(description)
            .fetch_one(&mut **tx)
            .await
    }

    /// Delete a check-in within an engine transaction.
    ///
    /// Returns `true` if the row existed.
    pub async fn delete(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM checkins WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a user's check-ins, most recent first, paginated.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CheckIn>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM checkins \
             WHERE user_id = $1 \
             ORDER BY timestamp DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CheckIn>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List a user's check-ins within `[start, end]`, oldest first.
    pub async fn list_by_user_between(
        pool: &PgPool,
        user_id: DbId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<CheckIn>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM checkins \
             WHERE user_id = $1 AND timestamp BETWEEN $2 AND $3 \
             ORDER BY timestamp ASC"
        );
        sqlx::query_as::<_, CheckIn>(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Timestamp of the oldest check-in, if any exist. Anchors the closure
    /// job's walk over completed periods.
    pub async fn earliest_timestamp(pool: &PgPool) -> Result<Option<Timestamp>, sqlx::Error> {
        sqlx::query_scalar("SELECT MIN(timestamp) FROM checkins")
            .fetch_one(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Ledger aggregation queries (transaction-scoped)
    // -----------------------------------------------------------------------

    /// Count a user's check-ins within `[start, end]`.
    pub async fn count_in_period(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*)::int4 FROM checkins \
             WHERE user_id = $1 AND timestamp BETWEEN $2 AND $3",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_one(&mut **tx)
        .await
    }

    /// Count a member's check-ins for one challenge within `[start, end]`.
    pub async fn count_in_period_for_challenge(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        challenge_id: DbId,
        user_id: DbId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*)::int4 FROM checkins \
             WHERE challenge_id = $1 AND user_id = $2 AND timestamp BETWEEN $3 AND $4",
        )
        .bind(challenge_id)
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_one(&mut **tx)
        .await
    }

    /// Count all of a member's check-ins for one challenge (progress recount).
    pub async fn count_for_challenge_member(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        challenge_id: DbId,
        user_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*)::int4 FROM checkins WHERE challenge_id = $1 AND user_id = $2",
        )
        .bind(challenge_id)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Every check-in ordered by timestamp (full rebuild scan).
    pub async fn scan_all_ordered(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Vec<CheckIn>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM checkins ORDER BY timestamp ASC, id ASC");
        sqlx::query_as::<_, CheckIn>(&query)
            .fetch_all(&mut **tx)
            .await
    }

    /// Every check-in for one challenge ordered by timestamp (challenge
    /// rebuild scan).
    pub async fn scan_challenge_ordered(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        challenge_id: DbId,
    ) -> Result<Vec<CheckIn>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM checkins \
             WHERE challenge_id = $1 \
             ORDER BY timestamp ASC, id ASC"
        );
        sqlx::query_as::<_, CheckIn>(&query)
            .bind(challenge_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// IDs of users with at least `min` check-ins within `[start, end]`.
    pub async fn users_meeting_minimum(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        start: Timestamp,
        end: Timestamp,
        min: i32,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT user_id FROM checkins \
             WHERE timestamp BETWEEN $1 AND $2 \
             GROUP BY user_id \
             HAVING COUNT(*) >= $3 \
             ORDER BY user_id",
        )
        .bind(start)
        .bind(end)
        .bind(i64::from(min))
        .fetch_all(&mut **tx)
        .await
    }
}
