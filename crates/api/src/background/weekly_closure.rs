//! Periodic end-of-week closure sweep.
//!
//! Spawns a background task that closes completed weeks (credits wins and
//! writes the closure marker) on a fixed interval using
//! `tokio::time::interval`. The sweep is idempotent, so an aggressive
//! interval only costs cheap no-op checks.

use std::time::Duration;

use chrono::Utc;
use grit_core::scoring::ScoringConfig;
use grit_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::engine::closure;

/// Default sweep interval: 1 hour.
const DEFAULT_INTERVAL_SECS: u64 = 3600;

/// Run the weekly closure loop.
///
/// Sweeps every completed week on each tick (interval from
/// `CLOSURE_INTERVAL_SECS`, defaults to hourly). Runs until `cancel` is
/// triggered.
pub async fn run(pool: DbPool, scoring: ScoringConfig, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("CLOSURE_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    tracing::info!(interval_secs, "Weekly closure job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Weekly closure job stopping");
                break;
            }
            _ = interval.tick() => {
                match closure::run(&pool, &scoring, Utc::now()).await {
                    Ok(outcome) => {
                        if outcome.closed > 0 {
                            tracing::info!(
                                closed = outcome.closed,
                                skipped = outcome.skipped,
                                "Weekly closure: closed completed weeks"
                            );
                        } else {
                            tracing::debug!("Weekly closure: no weeks to close");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Weekly closure: sweep failed");
                    }
                }
            }
        }
    }
}
