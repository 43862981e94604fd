pub mod admin;
pub mod auth;
pub mod challenges;
pub mod checkins;
pub mod health;
pub mod notifications;
pub mod rankings;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                      register (public)
/// /auth/login                         login (public)
///
/// /users/me                           get, update own profile
/// /users/{id}/checkins                check-in history (?limit, offset)
/// /users/{id}/checkins/week           one-week summary (?week_offset)
///
/// /checkins                           record check-in (POST)
/// /checkins/{id}                      update, delete (owner or admin)
///
/// /rankings/weekly                    current week podium (public)
/// /rankings/overall                   weeks-won standings (public)
///
/// /challenges                         list visible, create
/// /challenges/invite/{code}           resolve invite code
/// /challenges/{id}                    detail, update, delete
/// /challenges/{id}/join               request to join (POST)
/// /challenges/{id}/approve            approve join request (POST, creator)
/// /challenges/{id}/participants       list participants
/// /challenges/{id}/ranking            standings (?period=weekly|overall)
/// /challenge-participation            caller's participations
///
/// /notifications                      list (?unread_only, limit, offset)
/// /notifications/unread-count         unread count (GET)
/// /notifications/{id}/read            mark read (POST)
///
/// /admin/users                        list users (admin only)
/// /admin/recalculate/weekly           rebuild weekly ledger (POST)
/// /admin/recalculate/challenges       rebuild challenge ledgers (POST)
/// /admin/closure/run                  run closure sweep (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (register, login).
        .nest("/auth", auth::router())
        // Profiles and per-user check-in history.
        .nest("/users", users::router())
        // Check-in recording and edits.
        .nest("/checkins", checkins::router())
        // Public leaderboards.
        .nest("/rankings", rankings::router())
        // Challenge lifecycle, membership, and per-challenge rankings.
        .nest("/challenges", challenges::router())
        // The caller's own participations across challenges.
        .route(
            "/challenge-participation",
            get(handlers::challenges::my_participation),
        )
        // Notifications raised by the join/approve flow.
        .nest("/notifications", notifications::router())
        // Admin: user list, ledger rebuilds, closure trigger.
        .nest("/admin", admin::router())
}
