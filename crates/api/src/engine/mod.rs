//! Points engine: the transactional core of the scoring system.
//!
//! Everything that mutates points goes through this module so that the
//! invariants hold no matter which route triggered the change:
//!
//! - a user's `points` column is always the sum of their weekly ledger rows,
//! - a participant's `challenge_points` is always the sum of their challenge
//!   ledger rows,
//! - concurrent mutations for the same user serialize on the user row lock,
//! - serialization failures retry transparently instead of surfacing 5xx.
//!
//! Submodules:
//! - [`ledger`] -- the weekly (global) points ledger,
//! - [`challenge_ledger`] -- per-challenge period points and progress,
//! - [`checkins`] -- check-in create/update/delete orchestration,
//! - [`closure`] -- end-of-week closure (weeks-won credit),
//! - [`ranking`] -- podium assembly shared by the ranking endpoints,
//! - [`retry`] -- transparent retry for transient transaction conflicts.

pub mod challenge_ledger;
pub mod checkins;
pub mod closure;
pub mod ledger;
pub mod ranking;
pub mod retry;
