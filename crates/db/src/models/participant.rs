//! Challenge participant entity models.

use grit_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::challenge::Challenge;

/// A row from the `challenge_participants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChallengeParticipant {
    pub id: DbId,
    pub challenge_id: DbId,
    pub user_id: DbId,
    pub approved: bool,
    /// Running check-in count for the challenge.
    pub progress: i32,
    /// Materialized sum of this member's `challenge_points` rows.
    pub challenge_points: i32,
    pub joined_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Participant row joined with display fields from `users`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParticipantWithUser {
    pub id: DbId,
    pub challenge_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub profile_image: Option<String>,
    pub approved: bool,
    pub progress: i32,
    pub challenge_points: i32,
    pub joined_at: Timestamp,
}

/// One challenge the caller participates in, with their membership row.
#[derive(Debug, Clone, Serialize)]
pub struct Participation {
    pub challenge: Challenge,
    pub participant: ChallengeParticipant,
}
