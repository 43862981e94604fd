//! Podium assembly shared by the ranking endpoints.
//!
//! Wraps the core ranking rules (standard competition ranking, ties share
//! the podium) in the JSON shape the API returns.

use grit_core::ranking::{assign_ranks, split_podium, Ranked};
use serde::Serialize;

/// A standings row with its assigned rank, flattened for JSON.
#[derive(Debug, Serialize)]
pub struct RankedEntry<T: Serialize> {
    pub rank: i32,
    #[serde(flatten)]
    pub entry: T,
}

impl<T: Serialize> From<Ranked<T>> for RankedEntry<T> {
    fn from(ranked: Ranked<T>) -> Self {
        Self {
            rank: ranked.rank,
            entry: ranked.entry,
        }
    }
}

/// A ranking split into the podium and everyone else.
#[derive(Debug, Serialize)]
pub struct PodiumRanking<T: Serialize> {
    pub podium: Vec<RankedEntry<T>>,
    pub others: Vec<RankedEntry<T>>,
}

/// Rank `rows` by `score` descending and split off the podium.
pub fn podium_ranking<T: Serialize>(
    rows: Vec<T>,
    score: impl Fn(&T) -> i32,
) -> PodiumRanking<T> {
    let ranked = assign_ranks(rows, score);
    let (podium, others) = split_podium(ranked);
    PodiumRanking {
        podium: podium.into_iter().map(RankedEntry::from).collect(),
        others: others.into_iter().map(RankedEntry::from).collect(),
    }
}
