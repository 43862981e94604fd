use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Payload for the liveness probe.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` while the database answers, `"degraded"` otherwise.
    pub status: &'static str,
    /// Version straight out of Cargo.toml.
    pub version: &'static str,
    /// Whether the database round-trip succeeded.
    pub db_healthy: bool,
}

/// GET /health
///
/// Pings the database and reports overall service health. Always 200; a
/// broken database shows up as `"degraded"` rather than an error status.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = grit_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Routes mounted at the server root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
