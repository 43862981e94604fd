//! Transparent retry for transient transaction conflicts.
//!
//! Concurrent ledger transactions can deadlock or fail serialization when two
//! requests touch overlapping rows. PostgreSQL reports these as SQLSTATE
//! `40001` (serialization_failure) and `40P01` (deadlock_detected). Both are
//! safe to retry from scratch, so callers should never see them.

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Maximum number of attempts (initial try plus retries).
const MAX_ATTEMPTS: u32 = 3;

/// Backoff before the first retry; doubles on each subsequent retry.
const INITIAL_BACKOFF: Duration = Duration::from_millis(50);

/// SQLSTATE codes that indicate a transient, retryable conflict.
const RETRYABLE_SQLSTATES: &[&str] = &["40001", "40P01"];

fn is_retryable(error: &AppError) -> bool {
    let AppError::Database(sqlx::Error::Database(db_err)) = error else {
        return false;
    };
    db_err
        .code()
        .is_some_and(|code| RETRYABLE_SQLSTATES.contains(&code.as_ref()))
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// exhausts [`MAX_ATTEMPTS`].
///
/// The closure must start a fresh transaction on each call; retrying a
/// half-rolled-back transaction is not supported.
pub async fn with_retry<T, F, Fut>(op: &'static str, operation: F) -> AppResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt: u32 = 1;
    let mut backoff = INITIAL_BACKOFF;

    loop {
        match operation().await {
            Err(error) if attempt < MAX_ATTEMPTS && is_retryable(&error) => {
                tracing::warn!(
                    op,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "Transient transaction conflict, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                attempt += 1;
            }
            result => return result,
        }
    }
}
