//! fastq-subset: keep a fixed number of read pairs from the middle of a
//! paired-end library's quality distribution.
//!
//! A run makes two streaming passes over the R1/R2 files:
//!
//! 1. every pair is scored (see [`quality::pair_score`]) and only its index
//!    and score are kept;
//! 2. the scores are shuffled, sorted, and the `k` pairs around the median
//!    are chosen; the inputs are then re-read and the chosen pairs are
//!    written, in input order, to the two outputs.
//!
//! ```no_run
//! use fastq_subset::{run, InputSource, OutputPaths, SubsetConfig};
//!
//! # fn main() -> fastq_subset::Result<()> {
//! let config = SubsetConfig::new(1_000_000, Some(7))?;
//! let report = run(
//!     &config,
//!     &InputSource::from_path("sample_R1.fq.gz"),
//!     &InputSource::from_path("sample_R2.fq.gz"),
//!     &OutputPaths::new("sample_1.subset.fastq.gz", "sample_2.subset.fastq.gz"),
//! )?;
//! println!("kept {} of {} pairs", report.selected_pairs, report.total_pairs);
//! # Ok(())
//! # }
//! ```

pub mod collect;
pub mod config;
pub mod error;
pub mod fastq;
pub mod filter;
pub mod membership;
pub mod quality;
pub mod report;
pub mod select;

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub use crate::config::{Cli, SubsetConfig};
pub use crate::error::{Mate, Misalignment, Pass, Result, SubsetError};
pub use crate::fastq::{FastqRecord, InputSource, PairedReader};
pub use crate::membership::MembershipIndex;
pub use crate::report::RunReport;

use crate::collect::collect_scores;
use crate::fastq::{is_gzip_path, Writer};
use crate::filter::StreamFilter;
use crate::select::{select_middle, shuffle_entries, tie_breaker_rng, ScoreRange};

/// Result of the scoring pass and selection: everything the filtering pass
/// needs.
#[derive(Debug, Clone)]
pub struct SubsetPlan {
    pub total_pairs: u64,
    /// Seed actually used for tie-breaking
    pub seed: u64,
    pub index: MembershipIndex,
    pub score_range: Option<ScoreRange>,
    pub selected_score_range: Option<ScoreRange>,
}

/// Score every pair and choose which ones to keep.
pub fn plan_subset(
    config: &SubsetConfig,
    read1: &InputSource,
    read2: &InputSource,
) -> Result<SubsetPlan> {
    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!("Tie-breaking seed: {}", seed);

    let mut reader = PairedReader::open(read1, read2, Pass::Scoring)?;
    let mut entries = collect_scores(&mut reader, config)?;
    let total_pairs = entries.len() as u64;

    if config.k >= total_pairs {
        log::info!(
            "Subset size {} is not smaller than input ({} pairs); keeping all read pairs.",
            config.k,
            total_pairs
        );
    }

    shuffle_entries(&mut entries, &mut tie_breaker_rng(seed));
    let selection = select_middle(entries, config.k);

    if let (Some(full), Some(sel)) = (&selection.full_range, &selection.selected_range) {
        log::info!("Original quality score range: {} - {}", full.min, full.max);
        log::info!("Selected quality score range: {} - {}", sel.min, sel.max);
    }

    Ok(SubsetPlan {
        total_pairs,
        seed,
        index: MembershipIndex::from_indices(selection.indices),
        score_range: selection.full_range,
        selected_score_range: selection.selected_range,
    })
}

/// Re-read the inputs and write the planned pairs to `out1`/`out2`.
pub fn write_subset<W1: Write + ?Sized, W2: Write + ?Sized>(
    plan: &SubsetPlan,
    config: &SubsetConfig,
    read1: &InputSource,
    read2: &InputSource,
    out1: &mut W1,
    out2: &mut W2,
) -> Result<u64> {
    let mut reader = PairedReader::open(read1, read2, Pass::Filtering)?;
    StreamFilter::new(&plan.index, plan.total_pairs, config.progress_interval).run(
        &mut reader,
        out1,
        out2,
    )
}

/// Destination files of a run. Data goes to `<name>.partial` siblings that
/// are renamed into place only once both outputs are complete.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out1: PathBuf,
    pub out2: PathBuf,
}

impl OutputPaths {
    pub fn new<P1: AsRef<Path>, P2: AsRef<Path>>(out1: P1, out2: P2) -> Self {
        Self {
            out1: out1.as_ref().to_path_buf(),
            out2: out2.as_ref().to_path_buf(),
        }
    }

    pub fn partial(path: &Path) -> PathBuf {
        let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".partial");
        path.with_file_name(name)
    }

    /// Remove outputs left by an earlier run so a failed run cannot leave
    /// them looking complete.
    fn discard_stale(&self) -> Result<()> {
        for p in [&self.out1, &self.out2] {
            if p.is_file() {
                log::info!("Removing existing output {}", p.display());
                fs::remove_file(p)?;
            }
        }
        Ok(())
    }

    fn discard_partials(&self) {
        for p in [&self.out1, &self.out2] {
            let partial = Self::partial(p);
            if partial.exists() {
                if let Err(e) = fs::remove_file(&partial) {
                    log::warn!("Could not remove {}: {}", partial.display(), e);
                }
            }
        }
    }
}

fn write_outputs(
    plan: &SubsetPlan,
    config: &SubsetConfig,
    read1: &InputSource,
    read2: &InputSource,
    outputs: &OutputPaths,
) -> Result<u64> {
    let (tmp1, tmp2) = (OutputPaths::partial(&outputs.out1), OutputPaths::partial(&outputs.out2));
    let mut w1 = Writer::create(&tmp1, is_gzip_path(&outputs.out1), config.compression)?;
    let mut w2 = Writer::create(&tmp2, is_gzip_path(&outputs.out2), config.compression)?;

    let written = write_subset(plan, config, read1, read2, &mut w1, &mut w2)?;
    w1.finish()?;
    w2.finish()?;

    fs::rename(&tmp1, &outputs.out1)?;
    if let Err(e) = fs::rename(&tmp2, &outputs.out2) {
        // both outputs or neither
        if let Err(rm) = fs::remove_file(&outputs.out1) {
            log::warn!("Could not remove {}: {}", outputs.out1.display(), rm);
        }
        return Err(e.into());
    }
    Ok(written)
}

/// Run both passes end to end.
///
/// Existing files at the output paths are removed before the first pass,
/// so on error no output file is left in place under its final name.
pub fn run(
    config: &SubsetConfig,
    read1: &InputSource,
    read2: &InputSource,
    outputs: &OutputPaths,
) -> Result<RunReport> {
    outputs.discard_stale()?;
    let plan = plan_subset(config, read1, read2)?;

    let written = write_outputs(&plan, config, read1, read2, outputs).map_err(|e| {
        outputs.discard_partials();
        e
    })?;
    log::info!("Wrote {} read pairs.", written);

    Ok(RunReport {
        total_pairs: plan.total_pairs,
        requested_pairs: config.k,
        selected_pairs: written,
        seed: plan.seed,
        phred_offset: config.phred_offset,
        score_range: plan.score_range,
        selected_score_range: plan.selected_score_range,
        outputs: [outputs.out1.clone(), outputs.out2.clone()],
    })
}

#[cfg(test)]
pub(crate) mod test_util {
    /// FASTQ text with one record per quality string; sequences are all `A`.
    pub(crate) fn fastq(quals: &[&str]) -> Vec<u8> {
        let mut data = Vec::new();
        for (i, q) in quals.iter().enumerate() {
            data.extend_from_slice(format!("@read_{}\n", i).as_bytes());
            data.extend_from_slice("A".repeat(q.len()).as_bytes());
            data.extend_from_slice(b"\n+\n");
            data.extend_from_slice(q.as_bytes());
            data.push(b'\n');
        }
        data
    }
}
