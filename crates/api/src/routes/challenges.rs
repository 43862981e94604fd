//! Route definitions for the `/challenges` resource.
//!
//! All endpoints require authentication. `/invite/{code}` is registered
//! before `/{id}` so the static segment wins route matching.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::challenges;
use crate::state::AppState;

/// Routes mounted at `/challenges`.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create
/// GET    /invite/{code}       -> by_invite
/// GET    /{id}                -> detail
/// PUT    /{id}                -> update
/// DELETE /{id}                -> delete
/// POST   /{id}/join           -> join
/// POST   /{id}/approve        -> approve
/// GET    /{id}/participants   -> participants
/// GET    /{id}/ranking        -> ranking (?period=weekly|overall)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(challenges::list).post(challenges::create))
        .route("/invite/{code}", get(challenges::by_invite))
        .route(
            "/{id}",
            get(challenges::detail)
                .put(challenges::update)
                .delete(challenges::delete),
        )
        .route("/{id}/join", post(challenges::join))
        .route("/{id}/approve", post(challenges::approve))
        .route("/{id}/participants", get(challenges::participants))
        .route("/{id}/ranking", get(challenges::ranking))
}
