//! Per-pair quality score.

/// Sanger / Illumina 1.8+ encoding.
pub const PHRED33: u8 = 33;
/// Illumina 1.3-1.7 encoding.
pub const PHRED64: u8 = 64;

/// Mean Phred quality of one read, `None` for an empty read.
pub fn mean_phred(qual: &[u8], offset: u8) -> Option<f64> {
    if qual.is_empty() {
        return None;
    }
    let total: u64 = qual.iter().map(|&b| b as u64).sum();
    Some(total as f64 / qual.len() as f64 - offset as f64)
}

/// Score of a mate pair: the lower of the two mates' mean qualities, so a
/// pair is only as good as its worse read. An empty mate is ignored; a pair
/// with two empty mates scores `0.0`.
pub fn pair_score(qual1: &[u8], qual2: &[u8], offset: u8) -> f64 {
    match (mean_phred(qual1, offset), mean_phred(qual2, offset)) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => 0.0,
    }
}
