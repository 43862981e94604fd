//! Notification entity model.

use grit_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Known notification kinds.
pub mod kinds {
    /// Someone asked to join a challenge (sent to the creator).
    pub const JOIN_REQUEST: &str = "join_request";
    /// The creator approved a join request (sent to the requester).
    pub const JOIN_APPROVED: &str = "join_approved";
}

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub related_user_id: Option<DbId>,
    pub challenge_id: Option<DbId>,
    pub kind: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}
