use std::path::PathBuf;

use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SubsetError};
use crate::quality::{PHRED33, PHRED64};

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(
    name = "fastq-subset",
    version,
    about = "Keep the k read pairs from the middle of the quality distribution"
)]
pub struct Cli {
    #[arg(short = '1', long = "read1", help = "read 1 file")]
    pub read1: PathBuf,
    #[arg(short = '2', long = "read2", help = "read 2 file")]
    pub read2: PathBuf,
    #[arg(short = 'o', long = "output", help = "output file prefix (path and name)")]
    pub output: String,

    // Selection
    #[arg(short = 'k', default_value_t = 5_000_000, allow_negative_numbers = true,
          help = "number of read pairs to keep")]
    pub k: i64,
    #[arg(short = 's', long = "seed", help = "random seed for tie-breaking [default: random]")]
    pub seed: Option<u64>,
    #[arg(long = "phred64", action = ArgAction::SetTrue, help = "qualities are Phred+64 encoded")]
    pub phred64: bool,

    // Reporting
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,
    #[arg(short = 'i', long = "interval", default_value_t = 200_000,
          help = "progress reporting interval if verbose")]
    pub interval: u64,
    #[arg(short = 'j', long = "json", help = "write a JSON run report")]
    pub json: Option<PathBuf>,
    #[arg(long = "html", help = "write an HTML run report")]
    pub html: Option<PathBuf>,

    // Output
    #[arg(short = 'z', long = "compression", default_value_t = 4)]
    pub compression: u32,
}

impl Cli {
    pub fn out1(&self) -> PathBuf {
        PathBuf::from(format!("{}_1.subset.fastq.gz", self.output))
    }

    pub fn out2(&self) -> PathBuf {
        PathBuf::from(format!("{}_2.subset.fastq.gz", self.output))
    }

    /// Validate the run parameters. Nothing is opened until this succeeds.
    pub fn to_config(&self) -> Result<SubsetConfig> {
        let offset = if self.phred64 { PHRED64 } else { PHRED33 };
        SubsetConfig::new(self.k, self.seed)?
            .with_phred_offset(offset)?
            .with_progress_interval(self.interval)?
            .with_compression(self.compression)
    }
}

/// Run-scoped parameters handed to every stage of a subset run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubsetConfig {
    /// Number of pairs to keep
    pub k: u64,
    /// Tie-breaking seed; `None` draws a fresh one per run
    pub seed: Option<u64>,
    pub phred_offset: u8,
    /// Log progress every this many pairs
    pub progress_interval: u64,
    pub compression: u32,
}

impl SubsetConfig {
    pub fn new(k: i64, seed: Option<u64>) -> Result<Self> {
        let k = u64::try_from(k).map_err(|_| {
            SubsetError::InvalidParameter(format!("k must be non-negative, got {}", k))
        })?;
        Ok(Self {
            k,
            seed,
            phred_offset: PHRED33,
            progress_interval: 200_000,
            compression: 4,
        })
    }

    pub fn with_phred_offset(mut self, offset: u8) -> Result<Self> {
        if offset != PHRED33 && offset != PHRED64 {
            return Err(SubsetError::InvalidParameter(format!(
                "unsupported phred offset {}",
                offset
            )));
        }
        self.phred_offset = offset;
        Ok(self)
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Result<Self> {
        if interval == 0 {
            return Err(SubsetError::InvalidParameter(
                "interval must be greater than zero".to_string(),
            ));
        }
        self.progress_interval = interval;
        Ok(self)
    }

    pub fn with_compression(mut self, level: u32) -> Result<Self> {
        if level > 9 {
            return Err(SubsetError::InvalidParameter(format!(
                "compression level must be 0-9, got {}",
                level
            )));
        }
        self.compression = level;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["fastq-subset", "-1", "a.fq.gz", "-2", "b.fq.gz", "-o", "out/s"])
            .unwrap();
        assert_eq!(cli.k, 5_000_000);
        assert_eq!(cli.interval, 200_000);
        assert_eq!(cli.out1(), PathBuf::from("out/s_1.subset.fastq.gz"));
        assert_eq!(cli.out2(), PathBuf::from("out/s_2.subset.fastq.gz"));

        let cfg = cli.to_config().unwrap();
        assert_eq!(cfg.k, 5_000_000);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.phred_offset, PHRED33);
    }

    #[test]
    fn test_cli_requires_inputs() {
        assert!(Cli::try_parse_from(["fastq-subset", "-1", "a.fq.gz", "-o", "s"]).is_err());
    }

    #[test]
    fn test_negative_k_is_invalid_parameter() {
        let cli = Cli::try_parse_from([
            "fastq-subset", "-1", "a", "-2", "b", "-o", "s", "-k", "-3",
        ])
        .unwrap();
        assert!(matches!(cli.to_config(), Err(SubsetError::InvalidParameter(_))));
    }

    #[test]
    fn test_config_validation() {
        assert!(SubsetConfig::new(0, Some(1)).is_ok());
        assert!(SubsetConfig::new(10, None).unwrap().with_progress_interval(0).is_err());
        assert!(SubsetConfig::new(10, None).unwrap().with_phred_offset(40).is_err());
        assert!(SubsetConfig::new(10, None).unwrap().with_compression(10).is_err());
        let cfg = SubsetConfig::new(10, None).unwrap().with_phred_offset(PHRED64).unwrap();
        assert_eq!(cfg.phred_offset, 64);
    }
}
