//! Lockstep reading of the R1/R2 mate files.

use super::{FastqRecord, InputSource, Reader};
use crate::error::{Mate, Misalignment, Pass, Result, SubsetError};

/// Reads both mate files one record at a time, in step.
///
/// Knows which pass it serves so every error it raises names the pass and
/// the stream that triggered it.
pub struct PairedReader {
    r1: Reader,
    r2: Reader,
    pass: Pass,
    pairs: u64,
}

impl PairedReader {
    /// Open both sources from the start.
    pub fn open(in1: &InputSource, in2: &InputSource, pass: Pass) -> Result<Self> {
        log::debug!("{}: opening {} and {}", pass, in1, in2);
        let r1 = in1.open().map_err(|source| SubsetError::InputRead {
            pass,
            mate: Mate::R1,
            source,
        })?;
        let r2 = in2.open().map_err(|source| SubsetError::InputRead {
            pass,
            mate: Mate::R2,
            source,
        })?;
        Ok(Self::from_readers(r1, r2, pass))
    }

    pub fn from_readers(r1: Reader, r2: Reader, pass: Pass) -> Self {
        Self { r1, r2, pass, pairs: 0 }
    }

    pub fn pass(&self) -> Pass {
        self.pass
    }

    /// Number of complete pairs returned so far.
    pub fn pairs_read(&self) -> u64 {
        self.pairs
    }

    /// Next pair, or `None` once both files end together.
    pub fn next_pair(&mut self) -> Result<Option<(FastqRecord, FastqRecord)>> {
        let rec1 = self
            .r1
            .next_record()
            .map_err(|e| SubsetError::from_record(e, self.pass, Mate::R1))?;
        let rec2 = self
            .r2
            .next_record()
            .map_err(|e| SubsetError::from_record(e, self.pass, Mate::R2))?;

        match (rec1, rec2) {
            (Some(rec1), Some(rec2)) => {
                self.pairs += 1;
                Ok(Some((rec1, rec2)))
            }
            (None, None) => Ok(None),
            (Some(_), None) => Err(self.misaligned(Mate::R1)),
            (None, Some(_)) => Err(self.misaligned(Mate::R2)),
        }
    }

    fn misaligned(&self, longer: Mate) -> SubsetError {
        SubsetError::StreamMisalignment {
            pass: self.pass,
            detail: Misalignment::UnequalMates {
                longer,
                pairs: self.pairs,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::fastq;

    fn paired(n1: usize, n2: usize) -> PairedReader {
        let in1 = InputSource::from_bytes(fastq(&vec!["IIII"; n1]));
        let in2 = InputSource::from_bytes(fastq(&vec!["IIII"; n2]));
        PairedReader::open(&in1, &in2, Pass::Scoring).unwrap()
    }

    #[test]
    fn test_paired_basic() {
        let mut p = paired(3, 3);
        while p.next_pair().unwrap().is_some() {}
        assert_eq!(p.pairs_read(), 3);
    }

    #[test]
    fn test_paired_empty() {
        let mut p = paired(0, 0);
        assert!(p.next_pair().unwrap().is_none());
        assert_eq!(p.pairs_read(), 0);
    }

    #[test]
    fn test_paired_mismatch_r1_longer() {
        let mut p = paired(3, 2);
        assert!(p.next_pair().unwrap().is_some());
        assert!(p.next_pair().unwrap().is_some());
        match p.next_pair() {
            Err(SubsetError::StreamMisalignment { pass, detail }) => {
                assert_eq!(pass, Pass::Scoring);
                assert_eq!(
                    detail,
                    Misalignment::UnequalMates { longer: Mate::R1, pairs: 2 }
                );
            }
            other => panic!("expected misalignment, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_paired_mismatch_r2_longer() {
        let mut p = paired(0, 1);
        assert!(matches!(
            p.next_pair(),
            Err(SubsetError::StreamMisalignment {
                detail: Misalignment::UnequalMates { longer: Mate::R2, pairs: 0 },
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_mate_is_named() {
        let in1 = InputSource::from_bytes(fastq(&["II"]));
        let in2 = InputSource::from_bytes(b"@x\nAC\n+\nI\n".to_vec());
        let mut p = PairedReader::open(&in1, &in2, Pass::Filtering).unwrap();
        match p.next_pair() {
            Err(SubsetError::MalformedRecord { pass, mate, record, .. }) => {
                assert_eq!(pass, Pass::Filtering);
                assert_eq!(mate, Mate::R2);
                assert_eq!(record, 0);
            }
            other => panic!("expected malformed, got {:?}", other.map(|_| ())),
        }
    }
}
