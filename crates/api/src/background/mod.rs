//! Long-running jobs spawned at startup.
//!
//! Each submodule exposes an async entry point meant for `tokio::spawn`,
//! taking a `CancellationToken` so shutdown can stop it cleanly.

pub mod weekly_closure;
