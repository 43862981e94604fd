//! Route definitions for the `/rankings` resource.
//!
//! Both leaderboards are public.

use axum::routing::get;
use axum::Router;

use crate::handlers::rankings;
use crate::state::AppState;

/// Routes mounted at `/rankings`.
///
/// ```text
/// GET    /weekly    -> weekly
/// GET    /overall   -> overall
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/weekly", get(rankings::weekly))
        .route("/overall", get(rankings::overall))
}
