//! Error types for fastq-subset

use std::fmt;
use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, SubsetError>;

/// Which of the two streaming passes raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// First pass: collecting per-pair quality scores
    Scoring,
    /// Second pass: writing the selected pairs
    Filtering,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Scoring => write!(f, "scoring pass"),
            Pass::Filtering => write!(f, "filtering pass"),
        }
    }
}

/// Which mate file a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mate {
    R1,
    R2,
}

impl Mate {
    pub fn other(self) -> Mate {
        match self {
            Mate::R1 => Mate::R2,
            Mate::R2 => Mate::R1,
        }
    }
}

impl fmt::Display for Mate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mate::R1 => write!(f, "R1"),
            Mate::R2 => write!(f, "R2"),
        }
    }
}

/// How the two input streams disagreed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Misalignment {
    /// One mate file still has records after the other ran out
    UnequalMates { longer: Mate, pairs: u64 },
    /// Both files agree with each other but not with the scoring pass
    CountChanged { expected: u64, found: u64 },
}

impl fmt::Display for Misalignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Misalignment::UnequalMates { longer, pairs } => write!(
                f,
                "{} has more records than {} ({} continues after {} pairs)",
                longer,
                longer.other(),
                longer,
                pairs
            ),
            Misalignment::CountChanged { expected, found } => write!(
                f,
                "inputs now yield {} pairs but the scoring pass counted {}",
                found, expected
            ),
        }
    }
}

/// Record-level failure raised by [`crate::fastq::Reader`].
///
/// Carries no pass or mate; [`crate::fastq::PairedReader`] attaches both when
/// converting into [`SubsetError`].
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record {record}: {msg}")]
    Malformed { record: u64, msg: String },
}

/// Fatal errors of a subset run
#[derive(Debug, Error)]
pub enum SubsetError {
    /// The two inputs disagree on the number of pairs
    #[error("Stream misalignment in {pass}: {detail}")]
    StreamMisalignment { pass: Pass, detail: Misalignment },

    /// A record could not be parsed
    #[error("Malformed {mate} record {record} in {pass}: {msg}")]
    MalformedRecord {
        pass: Pass,
        mate: Mate,
        record: u64,
        msg: String,
    },

    /// Reading an input failed at the I/O level
    #[error("Failed to read {mate} in {pass}: {source}")]
    InputRead {
        pass: Pass,
        mate: Mate,
        #[source]
        source: std::io::Error,
    },

    /// A parameter was rejected before any I/O began
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Other I/O failure (opening inputs, writing outputs)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Run report serialisation failed
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

impl SubsetError {
    pub(crate) fn from_record(err: RecordError, pass: Pass, mate: Mate) -> Self {
        match err {
            RecordError::Io(source) => SubsetError::InputRead { pass, mate, source },
            RecordError::Malformed { record, msg } => SubsetError::MalformedRecord {
                pass,
                mate,
                record,
                msg,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misalignment_message_names_pass_and_stream() {
        let err = SubsetError::StreamMisalignment {
            pass: Pass::Filtering,
            detail: Misalignment::UnequalMates {
                longer: Mate::R2,
                pairs: 7,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("filtering pass"));
        assert!(msg.contains("R2 has more records than R1"));
        assert!(msg.contains("7 pairs"));
    }

    #[test]
    fn test_record_error_conversion() {
        let err = SubsetError::from_record(
            RecordError::Malformed {
                record: 3,
                msg: "missing '+' separator".to_string(),
            },
            Pass::Scoring,
            Mate::R1,
        );
        match err {
            SubsetError::MalformedRecord {
                pass, mate, record, ..
            } => {
                assert_eq!(pass, Pass::Scoring);
                assert_eq!(mate, Mate::R1);
                assert_eq!(record, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
