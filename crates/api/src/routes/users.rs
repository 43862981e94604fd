//! Route definitions for the `/users` resource.
//!
//! All endpoints require authentication.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /me                  -> me
/// PUT    /me                  -> update_me
/// GET    /{id}/checkins       -> list_checkins
/// GET    /{id}/checkins/week  -> week_summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::me).put(users::update_me))
        .route("/{id}/checkins", get(users::list_checkins))
        .route("/{id}/checkins/week", get(users::week_summary))
}
