//! Repository for the `users` table.

use grit_core::types::{DbId, Timestamp};
use grit_core::user::{STATUS_NORMAL, STATUS_ON_TRACK};
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, password_hash, is_admin, status, points, weeks_won, \
                        profile_image, created_at, updated_at";

/// Provides CRUD operations for users plus the ledger-side point
/// maintenance helpers.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, password_hash, is_admin)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(input.is_admin)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Update a user's profile. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                profile_image = COALESCE($3, profile_image)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.profile_image)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Ledger-side helpers (transaction-scoped)
    // -----------------------------------------------------------------------

    /// Lock the user row for the duration of a ledger transaction.
    ///
    /// All ledger writes for one user serialize on this lock, so concurrent
    /// check-in mutations in the same period cannot interleave their
    /// count-then-write steps.
    pub async fn lock_for_ledger(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Recompute `points` as the sum of the user's weekly_points rows.
    ///
    /// The ledger is the single source of truth for cumulative points; this
    /// is the only statement that ever writes `users.points`.
    pub async fn refresh_points(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE users SET points = COALESCE( \
                 (SELECT SUM(points)::int4 FROM weekly_points WHERE user_id = $1), 0) \
             WHERE id = $1 \
             RETURNING points",
        )
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Set the derived status label.
    pub async fn set_status(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
        status: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET status = $2 WHERE id = $1")
            .bind(user_id)
            .bind(status)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Credit one closed week to the user.
    pub async fn credit_week_won(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET weeks_won = weeks_won + 1 WHERE id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Reset every user's `points` from the ledger sums (full rebuild).
    pub async fn reset_all_points_from_ledger(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users u SET points = COALESCE( \
                 (SELECT SUM(wp.points)::int4 FROM weekly_points wp WHERE wp.user_id = u.id), 0)",
        )
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Recompute every user's status label from the current-period ledger
    /// row (full rebuild).
    pub async fn refresh_all_statuses(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        current_week_start: Timestamp,
        min_training_days: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users u SET status = CASE \
                 WHEN COALESCE((SELECT wp.checkin_count FROM weekly_points wp \
                                WHERE wp.user_id = u.id AND wp.week_start = $1), 0) >= $2 \
                 THEN $3 ELSE $4 END",
        )
        .bind(current_week_start)
        .bind(min_training_days)
        .bind(STATUS_ON_TRACK)
        .bind(STATUS_NORMAL)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
