//! Route definitions for the `/admin` resource.
//!
//! Every endpoint requires the admin flag.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /users                     -> list_users
/// POST   /recalculate/weekly        -> recalculate_weekly
/// POST   /recalculate/challenges    -> recalculate_challenges
/// POST   /closure/run               -> run_closure
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/recalculate/weekly", post(admin::recalculate_weekly))
        .route(
            "/recalculate/challenges",
            post(admin::recalculate_challenges),
        )
        .route("/closure/run", post(admin::run_closure))
}
