//! Standard competition ranking and podium partitioning.
//!
//! Rankings are computed at read time from the ledger tables; this module
//! holds only the pure tie-handling rules so the SQL side can stay a plain
//! sorted aggregate.

/// Highest rank still considered part of the podium.
pub const PODIUM_SIZE: i32 = 3;

/// An entry with its assigned competition rank.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T> {
    pub rank: i32,
    pub entry: T,
}

/// Assign standard competition ranks to entries already sorted descending by
/// score (display tiebreaks are the caller's concern).
///
/// Ties share a rank and the next distinct score resumes at its 1-based
/// position: scores `[5, 5, 3]` rank as `[1, 1, 3]`, never `[1, 1, 2]`.
pub fn assign_ranks<T>(entries: Vec<T>, score: impl Fn(&T) -> i32) -> Vec<Ranked<T>> {
    let mut ranked = Vec::with_capacity(entries.len());
    let mut last_score: Option<i32> = None;
    let mut last_rank = 0;

    for (index, entry) in entries.into_iter().enumerate() {
        let current = score(&entry);
        let rank = match last_score {
            Some(prev) if prev == current => last_rank,
            _ => index as i32 + 1,
        };
        last_score = Some(current);
        last_rank = rank;
        ranked.push(Ranked { rank, entry });
    }

    ranked
}

/// Split ranked entries into the podium (rank <= [`PODIUM_SIZE`], ties
/// included) and everyone else, preserving display order.
pub fn split_podium<T>(ranked: Vec<Ranked<T>>) -> (Vec<Ranked<T>>, Vec<Ranked<T>>) {
    ranked.into_iter().partition(|r| r.rank <= PODIUM_SIZE)
}
