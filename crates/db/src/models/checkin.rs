//! Check-in entity model and DTOs.

use grit_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `checkins` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CheckIn {
    pub id: DbId,
    pub user_id: DbId,
    /// `None` for a general check-in, set when it counts for a challenge.
    pub challenge_id: Option<DbId>,
    pub timestamp: Timestamp,
    /// Workout duration in minutes.
    pub duration: Option<f64>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a check-in. The owner comes from the authenticated
/// caller, never from the payload.
#[derive(Debug, Deserialize)]
pub struct CreateCheckIn {
    pub challenge_id: Option<DbId>,
    /// Defaults to the current instant when omitted.
    pub timestamp: Option<Timestamp>,
    pub duration: Option<f64>,
    pub description: Option<String>,
}

/// DTO for updating a check-in. All fields are optional; a changed
/// `timestamp` re-aggregates both the old and the new period.
#[derive(Debug, Deserialize)]
pub struct UpdateCheckIn {
    pub timestamp: Option<Timestamp>,
    pub duration: Option<f64>,
    pub description: Option<String>,
}
