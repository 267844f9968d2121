//! First pass: one score per read pair.

use crate::config::SubsetConfig;
use crate::error::Result;
use crate::fastq::PairedReader;
use crate::quality::pair_score;

/// Index of a read pair (0-based position in the input) and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEntry {
    pub index: u64,
    pub score: f64,
}

/// Stream both mate files once, scoring every pair.
///
/// Entries come back in input order with indices `0..n`. Only the current
/// pair's records are alive at any time.
pub fn collect_scores(reader: &mut PairedReader, config: &SubsetConfig) -> Result<Vec<ScoredEntry>> {
    let mut entries = Vec::new();
    let interval = config.progress_interval.max(1);

    while let Some((r1, r2)) = reader.next_pair()? {
        let index = entries.len() as u64;
        entries.push(ScoredEntry {
            index,
            score: pair_score(r1.quality(), r2.quality(), config.phred_offset),
        });

        let done = index + 1;
        if done % interval == 0 {
            log::info!("Collected quality scores of {} read pairs.", done);
        }
    }

    log::info!("Total number of read pairs: {}", entries.len());
    Ok(entries)
}
