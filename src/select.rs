//! Tie-breaking shuffle and middle-window selection.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use serde::Serialize;

use crate::collect::ScoredEntry;

/// RNG used for tie-breaking. Always seeded so a run can be replayed.
pub fn tie_breaker_rng(seed: u64) -> Xoshiro256StarStar {
    Xoshiro256StarStar::seed_from_u64(seed)
}

/// Uniformly permute the entries. Sorting stably afterwards leaves equal
/// scores in random rather than input order.
pub fn shuffle_entries<R: Rng + ?Sized>(entries: &mut [ScoredEntry], rng: &mut R) {
    entries.shuffle(rng);
}

/// Lowest and highest score of a set of entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

/// Outcome of selecting the middle window.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Original indices of the kept pairs, in no particular order
    pub indices: Vec<u64>,
    /// Range over all pairs; `None` when the input is empty
    pub full_range: Option<ScoreRange>,
    /// Range over the kept pairs; `None` when nothing is kept
    pub selected_range: Option<ScoreRange>,
}

/// Bounds `[start, end)` of the `k` middle entries out of `n`.
///
/// When `n - k` is odd the extra discarded entry comes off the high end.
pub fn middle_window(n: usize, k: usize) -> (usize, usize) {
    let k = k.min(n);
    let start = (n - k) / 2;
    (start, start + k)
}

/// Sort by score and keep the `k` entries around the median.
///
/// The sort is stable, so ties keep whatever order the caller left them in;
/// shuffle first with [`shuffle_entries`] for an unbiased pick among ties.
/// `k >= n` keeps everything.
pub fn select_middle(mut entries: Vec<ScoredEntry>, k: u64) -> Selection {
    entries.sort_by(|a, b| a.score.total_cmp(&b.score));

    let n = entries.len();
    let k = usize::try_from(k).unwrap_or(usize::MAX);
    let (start, end) = middle_window(n, k);
    let window = &entries[start..end];

    Selection {
        indices: window.iter().map(|e| e.index).collect(),
        full_range: range_of(&entries),
        selected_range: range_of(window),
    }
}

fn range_of(sorted: &[ScoredEntry]) -> Option<ScoreRange> {
    match (sorted.first(), sorted.last()) {
        (Some(lo), Some(hi)) => Some(ScoreRange {
            min: lo.score,
            max: hi.score,
        }),
        _ => None,
    }
}
