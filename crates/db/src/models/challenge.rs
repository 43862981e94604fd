//! Challenge and challenge-rules entity models and DTOs.

use grit_core::scoring::ChallengeScoring;
use grit_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `challenges` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Challenge {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub modality: String,
    pub target: i32,
    pub duration_days: i32,
    pub start_date: Timestamp,
    /// Always `start_date + duration_days`.
    pub end_date: Timestamp,
    /// Invite code, unique across all challenges.
    pub code: String,
    pub bet: Option<String>,
    pub is_private: bool,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `challenge_rules` table (zero or one per challenge).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChallengeRules {
    pub id: DbId,
    pub challenge_id: DbId,
    pub min_threshold: i32,
    pub min_points: i32,
    pub additional_unit: i32,
    pub additional_points: i32,
    pub unit_name: String,
    pub period: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ChallengeRules {
    /// The pure scoring tuple for this rule set.
    pub fn scoring(&self) -> ChallengeScoring {
        ChallengeScoring {
            min_threshold: self.min_threshold,
            min_points: self.min_points,
            additional_unit: self.additional_unit,
            additional_points: self.additional_points,
        }
    }
}

/// Challenge enriched with its optional rules, as returned by detail and
/// list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeDetail {
    #[serde(flatten)]
    pub challenge: Challenge,
    pub rules: Option<ChallengeRules>,
}

/// DTO for creating a challenge. `end_date` is derived, never supplied.
#[derive(Debug, Deserialize)]
pub struct CreateChallenge {
    pub title: String,
    pub description: Option<String>,
    pub modality: String,
    pub target: i32,
    pub duration_days: i32,
    pub start_date: Timestamp,
    pub bet: Option<String>,
    pub is_private: Option<bool>,
    pub rules: Option<CreateChallengeRules>,
}

/// Rule tuple supplied inline when creating a challenge.
#[derive(Debug, Deserialize)]
pub struct CreateChallengeRules {
    pub min_threshold: i32,
    pub min_points: i32,
    pub additional_unit: i32,
    pub additional_points: i32,
    pub unit_name: Option<String>,
    pub period: Option<String>,
}

impl CreateChallengeRules {
    /// The pure scoring tuple for validation before any row exists.
    pub fn scoring(&self) -> ChallengeScoring {
        ChallengeScoring {
            min_threshold: self.min_threshold,
            min_points: self.min_points,
            additional_unit: self.additional_unit,
            additional_points: self.additional_points,
        }
    }
}

/// DTO for updating a challenge before it starts. All fields are optional;
/// `end_date` is re-derived when `start_date` or `duration_days` change.
#[derive(Debug, Deserialize)]
pub struct UpdateChallenge {
    pub title: Option<String>,
    pub description: Option<String>,
    pub modality: Option<String>,
    pub target: Option<i32>,
    pub duration_days: Option<i32>,
    pub start_date: Option<Timestamp>,
    pub bet: Option<String>,
    pub is_private: Option<bool>,
}
