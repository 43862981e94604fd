//! Request handlers for the API surface.
//!
//! Each submodule provides async handler functions for a single resource.
//! Reads go straight to the repositories in `grit_db`; writes that touch
//! points go through [`crate::engine`] so the ledger invariants hold no
//! matter which route triggered them.

pub mod admin;
pub mod auth;
pub mod challenges;
pub mod checkins;
pub mod notifications;
pub mod rankings;
pub mod users;
