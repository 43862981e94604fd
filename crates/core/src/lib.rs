//! Domain logic for the grit backend: scoring periods, point formulas,
//! ranking rules, and challenge/user validation.
//!
//! This crate has zero internal deps so it can be used by the API/repository
//! layer and any future CLI or worker tooling.

pub mod challenge;
pub mod error;
pub mod period;
pub mod ranking;
pub mod scoring;
pub mod types;
pub mod user;
