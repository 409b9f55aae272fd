//! Sequence gap detection for a session's receipt set.
//!
//! A gap means a receipt may have been dropped or suppressed. Gaps are
//! reported, never rejected: policy belongs to the caller.
//!
//! Sequence values come from untrusted payloads, so detection must stay
//! total over any `u64` input. Gaps are reported as inclusive runs; the
//! output is bounded by the input size even when a claimed sequence is
//! absurdly large.

use serde::{Deserialize, Serialize};

/// A contiguous run of missing sequence numbers, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceGap {
    pub first: u64,
    pub last: u64,
}

impl SequenceGap {
    /// A run covering a single missing number.
    pub fn single(seq: u64) -> Self {
        Self {
            first: seq,
            last: seq,
        }
    }

    /// How many sequence numbers the run covers. Saturates at `u64::MAX`.
    pub fn count(&self) -> u64 {
        (self.last - self.first).saturating_add(1)
    }
}

/// The health of a session's sequence numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionHealth {
    /// Sequences form the contiguous run 0..=max.
    Complete,

    /// One or more sequence numbers are missing.
    HasGaps {
        /// The missing runs, ascending and non-overlapping.
        missing: Vec<SequenceGap>,
    },
}

impl SessionHealth {
    /// Check whether the session has no gaps.
    pub fn is_complete(&self) -> bool {
        matches!(self, SessionHealth::Complete)
    }
}

/// Find missing sequence numbers in a session's receipt set.
///
/// Sequences start at 0 and increment by exactly 1, so anything absent
/// from `0..=max` is a gap. Order and duplicates in the input do not
/// matter. An empty input has no gaps. Never panics and never allocates
/// more than the input size, whatever sequence values the input claims.
pub fn sequence_gaps(sequences: &[u64]) -> Vec<SequenceGap> {
    let mut sorted = sequences.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut gaps = Vec::new();
    let mut expected = 0u64;
    for &seq in &sorted {
        if seq > expected {
            gaps.push(SequenceGap {
                first: expected,
                last: seq - 1,
            });
        }
        // seq == u64::MAX leaves nothing above it to expect.
        expected = seq.saturating_add(1);
    }
    gaps
}

/// Summarize a session's sequence numbering.
pub fn session_health(sequences: &[u64]) -> SessionHealth {
    let missing = sequence_gaps(sequences);
    if missing.is_empty() {
        SessionHealth::Complete
    } else {
        SessionHealth::HasGaps { missing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_run_has_no_gaps() {
        assert_eq!(sequence_gaps(&[0, 1, 2]), Vec::<SequenceGap>::new());
        assert!(session_health(&[0, 1, 2]).is_complete());
    }

    #[test]
    fn test_gap_reports_missing_number() {
        assert_eq!(sequence_gaps(&[0, 2]), vec![SequenceGap::single(1)]);
        assert_eq!(
            session_health(&[0, 2]),
            SessionHealth::HasGaps {
                missing: vec![SequenceGap::single(1)]
            }
        );
    }

    #[test]
    fn test_missing_zero_is_a_gap() {
        assert_eq!(sequence_gaps(&[1, 2]), vec![SequenceGap::single(0)]);
    }

    #[test]
    fn test_order_and_duplicates_ignored() {
        assert_eq!(sequence_gaps(&[4, 0, 2, 2, 1]), vec![SequenceGap::single(3)]);
    }

    #[test]
    fn test_empty_session_is_complete() {
        assert!(session_health(&[]).is_complete());
    }

    #[test]
    fn test_multiple_gaps() {
        assert_eq!(
            sequence_gaps(&[0, 3, 6]),
            vec![
                SequenceGap { first: 1, last: 2 },
                SequenceGap { first: 4, last: 5 },
            ]
        );
    }

    #[test]
    fn test_extreme_claimed_sequences_stay_cheap() {
        // A hostile payload can claim any u64. Detection must not panic
        // and must not try to materialize the gap number by number.
        assert_eq!(
            sequence_gaps(&[u64::MAX]),
            vec![SequenceGap {
                first: 0,
                last: u64::MAX - 1,
            }]
        );
        assert_eq!(
            sequence_gaps(&[0, 1_000_000_000_000]),
            vec![SequenceGap {
                first: 1,
                last: 999_999_999_999,
            }]
        );

        let health = session_health(&[u64::MAX, 0]);
        assert_eq!(
            health,
            SessionHealth::HasGaps {
                missing: vec![SequenceGap {
                    first: 1,
                    last: u64::MAX - 1,
                }]
            }
        );
    }

    #[test]
    fn test_gap_count_saturates() {
        let gap = SequenceGap {
            first: 0,
            last: u64::MAX,
        };
        assert_eq!(gap.count(), u64::MAX);
        assert_eq!(SequenceGap::single(7).count(), 1);
    }
}
