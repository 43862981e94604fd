use std::sync::Arc;

use crate::config::ServerConfig;

/// State handed to every handler through `State<AppState>`.
///
/// Cloning is cheap: the config sits behind an `Arc` and the pool is
/// internally reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: grit_db::DbPool,
    /// Server configuration, including JWT settings and the scoring
    /// thresholds the points engine runs on.
    pub config: Arc<ServerConfig>,
}
