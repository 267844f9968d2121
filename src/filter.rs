//! Second pass: copy the selected pairs to the outputs.

use std::io::Write;

use crate::error::{Misalignment, Result, SubsetError};
use crate::fastq::PairedReader;
use crate::membership::MembershipIndex;

/// Writes every pair whose index is in the membership index, in input order.
pub struct StreamFilter<'a> {
    index: &'a MembershipIndex,
    expected_pairs: u64,
    progress_interval: u64,
}

impl<'a> StreamFilter<'a> {
    /// `expected_pairs` is the pair count seen by the scoring pass.
    pub fn new(index: &'a MembershipIndex, expected_pairs: u64, progress_interval: u64) -> Self {
        Self {
            index,
            expected_pairs,
            progress_interval: progress_interval.max(1),
        }
    }

    /// Stream `reader` to the end, writing selected mates verbatim.
    /// Returns the number of pairs written. Inputs are always read to the
    /// end so a count mismatch reports the real pair count.
    pub fn run<W1: Write + ?Sized, W2: Write + ?Sized>(
        &self,
        reader: &mut PairedReader,
        out1: &mut W1,
        out2: &mut W2,
    ) -> Result<u64> {
        let mut written = 0u64;
        let mut index = 0u64;

        while let Some((r1, r2)) = reader.next_pair()? {
            if self.index.contains(index) {
                r1.write_to(out1)?;
                r2.write_to(out2)?;
                written += 1;
            }

            index += 1;
            if index % self.progress_interval == 0 {
                log::info!("Filtered {} read pairs.", index);
            }
        }

        if index != self.expected_pairs {
            return Err(self.count_changed(reader, index));
        }
        log::debug!("{}: wrote {} of {} pairs", reader.pass(), written, index);
        Ok(written)
    }

    fn count_changed(&self, reader: &PairedReader, found: u64) -> SubsetError {
        SubsetError::StreamMisalignment {
            pass: reader.pass(),
            detail: Misalignment::CountChanged {
                expected: self.expected_pairs,
                found,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Mate, Pass};
    use crate::fastq::InputSource;
    use crate::test_util::fastq;

    fn filter(
        q1: &[&str],
        q2: &[&str],
        keep: &[u64],
        expected: u64,
    ) -> Result<(u64, Vec<u8>, Vec<u8>)> {
        let in1 = InputSource::from_bytes(fastq(q1));
        let in2 = InputSource::from_bytes(fastq(q2));
        let mut reader = PairedReader::open(&in1, &in2, Pass::Filtering)?;
        let index = MembershipIndex::from_indices(keep.iter().copied());
        let (mut out1, mut out2) = (Vec::new(), Vec::new());
        let n = StreamFilter::new(&index, expected, 1000).run(&mut reader, &mut out1, &mut out2)?;
        Ok((n, out1, out2))
    }

    #[test]
    fn test_writes_selected_pairs_in_input_order() {
        let q1 = ["II", "55", "##", "AA"];
        let q2 = ["III", "555", "###", "AAA"];
        // selection order does not matter
        let (n, out1, out2) = filter(&q1, &q2, &[3, 1], 4).unwrap();
        assert_eq!(n, 2);
        assert_eq!(out1, fastq_subset(&q1, &[1, 3]));
        assert_eq!(out2, fastq_subset(&q2, &[1, 3]));
    }

    fn fastq_subset(quals: &[&str], keep: &[usize]) -> Vec<u8> {
        let all = fastq(quals);
        let lines: Vec<&[u8]> = all.split_inclusive(|&b| b == b'\n').collect();
        keep.iter()
            .flat_map(|&i| lines[i * 4..i * 4 + 4].concat())
            .collect()
    }

    #[test]
    fn test_keep_all_reproduces_input() {
        let q = ["IIII", "5", "", "++"];
        let (n, out1, out2) = filter(&q, &q, &[0, 1, 2, 3], 4).unwrap();
        assert_eq!(n, 4);
        assert_eq!(out1, fastq(&q));
        assert_eq!(out2, fastq(&q));
    }

    #[test]
    fn test_keep_none_writes_nothing() {
        let (n, out1, out2) = filter(&["II", "II"], &["II", "II"], &[], 2).unwrap();
        assert_eq!(n, 0);
        assert!(out1.is_empty() && out2.is_empty());
    }

    #[test]
    fn test_shorter_than_scoring_pass() {
        let err = filter(&["II"], &["II"], &[0], 2).unwrap_err();
        assert!(matches!(
            err,
            SubsetError::StreamMisalignment {
                pass: Pass::Filtering,
                detail: Misalignment::CountChanged { expected: 2, found: 1 },
            }
        ));
    }

    #[test]
    fn test_longer_than_scoring_pass() {
        let q = vec!["II"; 10];
        let err = filter(&q, &q, &[0, 1], 2).unwrap_err();
        assert!(matches!(
            err,
            SubsetError::StreamMisalignment {
                detail: Misalignment::CountChanged { expected: 2, found: 10 },
                ..
            }
        ));
        assert!(err.to_string().contains("yield 10 pairs"));
    }

    #[test]
    fn test_unequal_mates() {
        let err = filter(&["II", "II"], &["II"], &[0], 2).unwrap_err();
        assert!(matches!(
            err,
            SubsetError::StreamMisalignment {
                detail: Misalignment::UnequalMates { longer: Mate::R1, pairs: 1 },
                ..
            }
        ));
    }
}
