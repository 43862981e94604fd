//! Repository for challenge membership rows.

use grit_core::types::DbId;
use sqlx::PgPool;
use std::collections::HashMap;

use crate::models::challenge::Challenge;
use crate::models::participant::{ChallengeParticipant, ParticipantWithUser, Participation};

const COLUMNS: &str = "id, challenge_id, user_id, approved, progress, challenge_points, \
                        joined_at, created_at, updated_at";

/// Provides CRUD and locking for challenge participants.
pub struct ParticipantRepo;

impl ParticipantRepo {
    /// Insert a membership row. Creators join pre-approved; everyone else
    /// starts pending.
    pub async fn create(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        challenge_id: DbId,
        user_id: DbId,
        approved: bool,
    ) -> Result<ChallengeParticipant, sqlx::Error> {
        let query = format!(
            "INSERT INTO challenge_participants (challenge_id, user_id, approved) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChallengeParticipant>(&query)
            .bind(challenge_id)
            .bind(user_id)
            .bind(approved)
            .fetch_one(&mut **tx)
            .await
    }

    /// Membership row for one user in one challenge.
    pub async fn find(
        pool: &PgPool,
        challenge_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ChallengeParticipant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM challenge_participants \
             WHERE challenge_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, ChallengeParticipant>(&query)
            .bind(challenge_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Lock one membership row for the duration of the transaction.
    ///
    /// Serializes concurrent progress and points writes for the same member,
    /// mirroring the row lock taken on `users` for the weekly ledger.
    pub async fn lock_member(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        challenge_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ChallengeParticipant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM challenge_participants \
             WHERE challenge_id = $1 AND user_id = $2 \
             FOR UPDATE"
        );
        sqlx::query_as::<_, ChallengeParticipant>(&query)
            .bind(challenge_id)
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Approve a pending member. Returns the updated row, or `None` when no
    /// membership exists.
    pub async fn approve(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        challenge_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ChallengeParticipant>, sqlx::Error> {
        let query = format!(
            "UPDATE challenge_participants SET approved = TRUE \
             WHERE challenge_id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChallengeParticipant>(&query)
            .bind(challenge_id)
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Shift a member's running check-in count by `delta` (negative on
    /// deletes), clamped at zero. Returns the new progress.
    pub async fn increment_progress(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        delta: i32,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE challenge_participants SET progress = GREATEST(progress + $2, 0) \
             WHERE id = $1 \
             RETURNING progress",
        )
        .bind(id)
        .bind(delta)
        .fetch_one(&mut **tx)
        .await
    }

    /// Overwrite a member's running check-in count (rebuilds).
    pub async fn set_progress(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        progress: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE challenge_participants SET progress = $2 WHERE id = $1")
            .bind(id)
            .bind(progress)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Overwrite a member's materialized points total.
    pub async fn set_challenge_points(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        points: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE challenge_participants SET challenge_points = $2 WHERE id = $1")
            .bind(id)
            .bind(points)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// All membership rows for a challenge, inside a rebuild transaction.
    pub async fn list_members(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        challenge_id: DbId,
    ) -> Result<Vec<ChallengeParticipant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM challenge_participants \
             WHERE challenge_id = $1 \
             ORDER BY joined_at ASC"
        );
        sqlx::query_as::<_, ChallengeParticipant>(&query)
            .bind(challenge_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// Participants of a challenge with display fields, earliest joiner first.
    pub async fn list_for_challenge(
        pool: &PgPool,
        challenge_id: DbId,
    ) -> Result<Vec<ParticipantWithUser>, sqlx::Error> {
        sqlx::query_as::<_, ParticipantWithUser>(
            "SELECT p.id, p.challenge_id, p.user_id, u.username, u.profile_image, \
                    p.approved, p.progress, p.challenge_points, p.joined_at \
             FROM challenge_participants p \
             JOIN users u ON u.id = p.user_id \
             WHERE p.challenge_id = $1 \
             ORDER BY p.joined_at ASC",
        )
        .bind(challenge_id)
        .fetch_all(pool)
        .await
    }

    /// Every challenge the user belongs to, paired with their membership row.
    /// Most recently joined first.
    pub async fn list_participations(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Participation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM challenge_participants \
             WHERE user_id = $1 \
             ORDER BY joined_at DESC"
        );
        let participants = sqlx::query_as::<_, ChallengeParticipant>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        if participants.is_empty() {
            return Ok(Vec::new());
        }

        let challenge_ids: Vec<DbId> = participants.iter().map(|p| p.challenge_id).collect();
        let challenges = sqlx::query_as::<_, Challenge>(
            "SELECT id, title, description, modality, target, duration_days, start_date, \
                    end_date, code, bet, is_private, created_by, created_at, updated_at \
             FROM challenges WHERE id = ANY($1)",
        )
        .bind(&challenge_ids)
        .fetch_all(pool)
        .await?;
        let mut by_id: HashMap<DbId, Challenge> =
            challenges.into_iter().map(|c| (c.id, c)).collect();

        Ok(participants
            .into_iter()
            .filter_map(|participant| {
                by_id
                    .remove(&participant.challenge_id)
                    .map(|challenge| Participation {
                        challenge,
                        participant,
                    })
            })
            .collect())
    }
}
