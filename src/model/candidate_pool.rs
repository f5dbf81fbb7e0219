use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;

/// Every answer a puzzle may use, bucketed by length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePool {
    buckets: BTreeMap<usize, BTreeSet<String>>,
}

impl CandidatePool {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut buckets: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();
        for word in words {
            let word = word.into();
            buckets.entry(word.len()).or_default().insert(word);
        }
        Self { buckets }
    }

    /// Read whitespace separated answers, each made of ASCII digits only.
    pub fn parse_words(text: &str) -> Result<Self, PuzzleError> {
        let words = text
            .split_whitespace()
            .map(|word| {
                if word.bytes().all(|byte| byte.is_ascii_digit()) {
                    Ok(word)
                } else {
                    Err(PuzzleError::InvalidCandidate(word.to_string()))
                }
            })
            .collect::<Result<Vec<&str>, PuzzleError>>()?;
        Ok(Self::from_words(words))
    }

    /// All candidates of the given length, if the pool has any.
    pub fn bucket(&self, len: usize) -> Option<&BTreeSet<String>> {
        self.buckets.get(&len)
    }

    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for CandidatePool {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_words(iter)
    }
}

/// Every `i.pow(power)` within `start..=stop`, as decimal strings in increasing order.
pub fn powers_in_range(power: u32, start: u64, stop: u64) -> impl Iterator<Item = String> {
    let bases = if power == 0 {
        0..0
    } else {
        // float estimate of the root, corrected below with exact integer powers
        let root = (start as f64).powf(1.0 / power as f64).floor() as u64;
        root.saturating_sub(1)..u64::MAX
    };
    bases
        .map_while(move |base| base.checked_pow(power))
        .skip_while(move |value| *value < start)
        .take_while(move |value| *value <= stop)
        .map(|value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tests::fixture_words;

    #[test]
    fn test_buckets() {
        let pool = CandidatePool::from_words(fixture_words());
        assert_eq!(pool.lengths().collect::<Vec<_>>(), vec![4, 5, 6]);
        assert_eq!(pool.bucket(4).unwrap().len(), 4);
        assert_eq!(pool.bucket(5).unwrap().len(), 5);
        assert_eq!(pool.bucket(6).unwrap().len(), 6);
        assert!(pool.bucket(3).is_none());
        assert_eq!(pool.len(), 15);
    }

    #[test]
    fn test_duplicates_collapse() {
        let pool: CandidatePool = ["12", "12", "34"].into_iter().collect();
        assert_eq!(pool.len(), 2);
        assert!(!pool.is_empty());
        assert!(CandidatePool::default().is_empty());
    }

    #[test]
    fn test_parse_words() {
        let pool = CandidatePool::parse_words("12 345\n  67\t890\n").unwrap();
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.bucket(2).unwrap().len(), 2);
        assert_eq!(pool.bucket(3).unwrap().len(), 2);

        for text in ["12 3a4", "12 \u{0661}\u{0662}", "-12", "1.5"] {
            assert!(
                matches!(CandidatePool::parse_words(text), Err(PuzzleError::InvalidCandidate(_))),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn test_powers_in_range() {
        let cases = [
            (2, 10, 1000, "16", "961"),
            (2, 100, 10_000, "100", "10000"),
            (3, 1000, 10_000, "1000", "9261"),
            (3, 10_000, 100_000, "10648", "97336"),
            (3, 100_000, 1_000_000, "103823", "1000000"),
            (3, 1_000_000, 10_000_000, "1000000", "9938375"),
        ];
        for (power, start, stop, first, last) in cases {
            let powers: Vec<String> = powers_in_range(power, start, stop).collect();
            assert_eq!(powers.first().map(String::as_str), Some(first));
            assert_eq!(powers.last().map(String::as_str), Some(last));
        }
    }

    #[test]
    fn test_powers_in_range_is_complete() {
        let squares: Vec<String> = powers_in_range(2, 10, 100).collect();
        assert_eq!(squares, vec!["16", "25", "36", "49", "64", "81", "100"]);
    }

    #[test]
    fn test_powers_in_range_bounds_are_inclusive() {
        assert_eq!(powers_in_range(2, 16, 16).collect::<Vec<_>>(), vec!["16"]);
        assert_eq!(
            powers_in_range(3, 125, 1_000).collect::<Vec<_>>(),
            vec!["125", "216", "343", "512", "729", "1000"]
        );
    }

    #[test]
    fn test_powers_in_range_edge_cases() {
        assert_eq!(powers_in_range(0, 1, 100).count(), 0);
        assert_eq!(powers_in_range(2, 50, 60).count(), 0);
        assert_eq!(
            powers_in_range(1, 0, 3).collect::<Vec<_>>(),
            vec!["0", "1", "2", "3"]
        );
    }
}
