//! Route definitions for the `/checkins` resource.
//!
//! All endpoints require authentication; mutations are owner-or-admin.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::checkins;
use crate::state::AppState;

/// Routes mounted at `/checkins`.
///
/// ```text
/// POST   /       -> create
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(checkins::create))
        .route("/{id}", put(checkins::update).delete(checkins::delete))
}
