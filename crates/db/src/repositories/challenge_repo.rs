//! Repository for challenges and their optional scoring rules.

use grit_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::challenge::{
    Challenge, ChallengeRules, CreateChallenge, CreateChallengeRules, UpdateChallenge,
};

const COLUMNS: &str = "id, title, description, modality, target, duration_days, start_date, \
                        end_date, code, bet, is_private, created_by, created_at, updated_at";

const RULES_COLUMNS: &str = "id, challenge_id, min_threshold, min_points, additional_unit, \
                              additional_points, unit_name, period, created_at, updated_at";

/// Provides CRUD operations for challenges.
pub struct ChallengeRepo;

impl ChallengeRepo {
    /// Insert a challenge. `code` and `end_date` are derived by the caller,
    /// never taken from client input.
    pub async fn create(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        created_by: DbId,
        data: &CreateChallenge,
        code: &str,
        end_date: Timestamp,
    ) -> Result<Challenge, sqlx::Error> {
        let query = format!(
            "INSERT INTO challenges \
                 (title, description, modality, target, duration_days, start_date, end_date, \
                  code, bet, is_private, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, TRUE), $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Challenge>(&query)
            .bind(&data.title)
            .bind(&data.description)
            .bind(&data.modality)
            .bind(data.target)
            .bind(data.duration_days)
            .bind(data.start_date)
            .bind(end_date)
            .bind(code)
            .bind(&data.bet)
            .bind(data.is_private)
            .bind(created_by)
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert the scoring rules row for a challenge.
    pub async fn create_rules(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        challenge_id: DbId,
        rules: &CreateChallengeRules,
    ) -> Result<ChallengeRules, sqlx::Error> {
        let query = format!(
            "INSERT INTO challenge_rules \
                 (challenge_id, min_threshold, min_points, additional_unit, additional_points, \
                  unit_name, period) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'workouts'), COALESCE($7, 'weekly')) \
             RETURNING {RULES_COLUMNS}"
        );
        sqlx::query_as::<_, ChallengeRules>(&query)
            .bind(challenge_id)
            .bind(rules.min_threshold)
            .bind(rules.min_points)
            .bind(rules.additional_unit)
            .bind(rules.additional_points)
            .bind(&rules.unit_name)
            .bind(&rules.period)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Challenge>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM challenges WHERE id = $1");
        sqlx::query_as::<_, Challenge>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up a challenge by its invite code.
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<Challenge>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM challenges WHERE code = $1");
        sqlx::query_as::<_, Challenge>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Scoring rules for a challenge, if any were defined. Rules are
    /// immutable after creation, so reading outside a transaction is safe
    /// even mid-rebuild.
    pub async fn find_rules(
        pool: &PgPool,
        challenge_id: DbId,
    ) -> Result<Option<ChallengeRules>, sqlx::Error> {
        let query = format!("SELECT {RULES_COLUMNS} FROM challenge_rules WHERE challenge_id = $1");
        sqlx::query_as::<_, ChallengeRules>(&query)
            .bind(challenge_id)
            .fetch_optional(pool)
            .await
    }

    /// Every rule set, inside a rebuild transaction.
    pub async fn list_rules(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Vec<ChallengeRules>, sqlx::Error> {
        let query =
            format!("SELECT {RULES_COLUMNS} FROM challenge_rules ORDER BY challenge_id ASC");
        sqlx::query_as::<_, ChallengeRules>(&query)
            .fetch_all(&mut **tx)
            .await
    }

    /// Challenges the user may see: public ones, their own, and any they
    /// participate in. Soonest-starting last so new challenges lead.
    pub async fn list_visible(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Challenge>, sqlx::Error> {
        sqlx::query_as::<_, Challenge>(
            "SELECT c.id, c.title, c.description, c.modality, c.target, c.duration_days, \
                    c.start_date, c.end_date, c.code, c.bet, c.is_private, c.created_by, \
                    c.created_at, c.updated_at \
             FROM challenges c \
             LEFT JOIN challenge_participants p \
                 ON p.challenge_id = c.id AND p.user_id = $1 \
             WHERE c.is_private = FALSE OR c.created_by = $1 OR p.id IS NOT NULL \
             ORDER BY c.start_date DESC, c.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Every challenge id, inside a rebuild transaction.
    pub async fn list_ids(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM challenges ORDER BY id ASC")
            .fetch_all(&mut **tx)
            .await
    }

    /// Apply a partial update and re-derive `end_date` from the effective
    /// start date and duration. Returns `None` when the challenge does not
    /// exist.
    pub async fn update(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        data: &UpdateChallenge,
    ) -> Result<Option<Challenge>, sqlx::Error> {
        let query = format!(
            "UPDATE challenges SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 modality = COALESCE($4, modality), \
                 target = COALESCE($5, target), \
                 duration_days = COALESCE($6, duration_days), \
                 start_date = COALESCE($7, start_date), \
                 bet = COALESCE($8, bet), \
                 is_private = COALESCE($9, is_private), \
                 end_date = COALESCE($7, start_date) \
                     + COALESCE($6, duration_days) * INTERVAL '1 day' \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Challenge>(&query)
            .bind(id)
            .bind(&data.title)
            .bind(&data.description)
            .bind(&data.modality)
            .bind(data.target)
            .bind(data.duration_days)
            .bind(data.start_date)
            .bind(&data.bet)
            .bind(data.is_private)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Delete a challenge. Rules, memberships, ledger rows and challenge
    /// check-ins go with it via cascades. Returns `false` when nothing
    /// matched.
    pub async fn delete(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM challenges WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
