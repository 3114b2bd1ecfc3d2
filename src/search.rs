//! Linear, binary and exponential search over keyed sequences.
//!
//! Binary and exponential search assume ascending key order and do not check
//! it: on unsorted input they may miss keys that are present. Callers that
//! cannot vouch for the order should go through [`SortedView`], whose
//! constructor validates it once up front.

use std::fmt;

use serde::Serialize;

use crate::error::{SkuBenchError, SkuBenchResult};
use crate::record::Keyed;
use crate::sort::first_unsorted_index;

/// Scan from the front and return the first element whose key equals `key`.
pub fn linear_search<'a, T: Keyed>(data: &'a [T], key: &str) -> Option<&'a T> {
    data.iter().find(|item| item.key() == key)
}

/// Halving search over the whole of `sorted`.
pub fn binary_search<'a, T: Keyed>(sorted: &'a [T], key: &str) -> Option<&'a T> {
    if sorted.is_empty() {
        return None;
    }
    binary_search_range(sorted, key, 0, sorted.len() - 1)
}

/// Halving search restricted to the inclusive index range `[left, right]`.
///
/// `right` is clamped to the last index; an empty or inverted range finds
/// nothing.
pub fn binary_search_range<'a, T: Keyed>(
    sorted: &'a [T],
    key: &str,
    left: usize,
    right: usize,
) -> Option<&'a T> {
    if sorted.is_empty() {
        return None;
    }
    // Half-open internally so the upper bound never underflows.
    let mut lo = left;
    let mut hi = right.min(sorted.len() - 1) + 1;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let mid_key = sorted[mid].key();
        if mid_key == key {
            return Some(&sorted[mid]);
        } else if mid_key < key {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    None
}

/// Probe indices 1, 2, 4, ... until one reaches `key` (or the end), then
/// binary search the bracket `[bound / 2, min(bound, len - 1)]`.
pub fn exponential_search<'a, T: Keyed>(sorted: &'a [T], key: &str) -> Option<&'a T> {
    let first = sorted.first()?;
    if first.key() == key {
        return Some(first);
    }

    let mut bound = 1;
    while bound < sorted.len() && sorted[bound].key() < key {
        bound *= 2;
    }

    binary_search_range(sorted, key, bound / 2, bound.min(sorted.len() - 1))
}

/// The lookup strategies the harness knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithm {
    Linear,
    Binary,
    Exponential,
}

impl SearchAlgorithm {
    pub const ALL: [SearchAlgorithm; 3] = [
        SearchAlgorithm::Linear,
        SearchAlgorithm::Binary,
        SearchAlgorithm::Exponential,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SearchAlgorithm::Linear => "Linear Search",
            SearchAlgorithm::Binary => "Binary Search",
            SearchAlgorithm::Exponential => "Exponential Search",
        }
    }

    pub fn requires_sorted(self) -> bool {
        !matches!(self, SearchAlgorithm::Linear)
    }

    pub fn search<'a, T: Keyed>(self, data: &'a [T], key: &str) -> Option<&'a T> {
        match self {
            SearchAlgorithm::Linear => linear_search(data, key),
            SearchAlgorithm::Binary => binary_search(data, key),
            SearchAlgorithm::Exponential => exponential_search(data, key),
        }
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A slice known to be in ascending key order.
#[derive(Debug, Clone, Copy)]
pub struct SortedView<'a, T> {
    items: &'a [T],
}

impl<'a, T: Keyed> SortedView<'a, T> {
    /// Check the order once and wrap the slice.
    pub fn try_new(items: &'a [T]) -> SkuBenchResult<Self> {
        match first_unsorted_index(items) {
            Some(index) => Err(SkuBenchError::UnsortedInput { index }),
            None => Ok(SortedView { items }),
        }
    }

    /// Wrap a slice the caller already sorted with [`crate::sort::merge_sort`].
    pub(crate) fn trusted(items: &'a [T]) -> Self {
        SortedView { items }
    }

    pub fn as_slice(&self) -> &'a [T] {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn binary_search(&self, key: &str) -> Option<&'a T> {
        binary_search(self.items, key)
    }

    pub fn exponential_search(&self, key: &str) -> Option<&'a T> {
        exponential_search(self.items, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::sort::merge_sort;

    fn records(keys: &[&str]) -> Vec<Record> {
        keys.iter().map(|k| Record::new(*k)).collect()
    }

    fn sorted_abcde() -> Vec<Record> {
        records(&["a", "b", "c", "d", "e"])
    }

    #[test]
    fn test_binary_search_example_scenario() {
        let sorted = sorted_abcde();
        let found = binary_search(&sorted, "d").unwrap();
        assert_eq!(found.key(), "d");
        assert!(std::ptr::eq(found, &sorted[3]));
    }

    #[test]
    fn test_absent_key_not_found_anywhere() {
        let sorted = sorted_abcde();
        for algorithm in SearchAlgorithm::ALL {
            assert!(algorithm.search(&sorted, "z").is_none(), "{}", algorithm);
            assert!(algorithm.search(&sorted, "0").is_none(), "{}", algorithm);
            assert!(algorithm.search(&sorted, "bb").is_none(), "{}", algorithm);
        }
    }

    #[test]
    fn test_every_key_found_by_every_algorithm() {
        let sorted = sorted_abcde();
        for algorithm in SearchAlgorithm::ALL {
            for (i, record) in sorted.iter().enumerate() {
                let found = algorithm.search(&sorted, record.key()).unwrap();
                assert!(std::ptr::eq(found, &sorted[i]), "{} missed {}", algorithm, record);
            }
        }
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<Record> = Vec::new();
        assert!(linear_search(&empty, "a").is_none());
        assert!(binary_search(&empty, "a").is_none());
        assert!(exponential_search(&empty, "a").is_none());
        assert!(binary_search_range(&empty, "a", 0, 0).is_none());
    }

    #[test]
    fn test_linear_search_handles_unsorted_input() {
        let unsorted = records(&["c", "a", "e", "b", "d"]);
        assert_eq!(linear_search(&unsorted, "e").unwrap().key(), "e");
        assert!(linear_search(&unsorted, "z").is_none());
    }

    #[test]
    fn test_linear_search_returns_first_match() {
        #[derive(Debug)]
        struct Tagged(&'static str, u8);
        impl Keyed for Tagged {
            fn key(&self) -> &str {
                self.0
            }
        }
        let data = [Tagged("x", 0), Tagged("y", 1), Tagged("y", 2)];
        assert_eq!(linear_search(&data, "y").unwrap().1, 1);
    }

    #[test]
    fn test_binary_search_range_respects_bounds() {
        let sorted = sorted_abcde();
        assert!(binary_search_range(&sorted, "a", 1, 4).is_none());
        assert_eq!(binary_search_range(&sorted, "b", 1, 4).unwrap().key(), "b");
        assert!(binary_search_range(&sorted, "e", 0, 3).is_none());
        assert_eq!(binary_search_range(&sorted, "e", 2, 100).unwrap().key(), "e");
        assert!(binary_search_range(&sorted, "c", 3, 1).is_none());
    }

    #[test]
    fn test_exponential_search_past_last_probe() {
        // Bracket where the probe overshoots the end: len 6, probes 1, 2, 4, 8.
        let sorted = records(&["a", "b", "c", "d", "e", "f"]);
        assert_eq!(exponential_search(&sorted, "f").unwrap().key(), "f");
        assert_eq!(exponential_search(&sorted, "e").unwrap().key(), "e");
        assert!(exponential_search(&sorted, "g").is_none());
    }

    #[test]
    fn test_exponential_search_first_element() {
        let sorted = records(&["a"]);
        assert_eq!(exponential_search(&sorted, "a").unwrap().key(), "a");
        assert!(exponential_search(&sorted, "b").is_none());
    }

    #[test]
    fn test_sorted_view_rejects_unsorted() {
        let unsorted = records(&["a", "c", "b"]);
        let err = SortedView::try_new(&unsorted).unwrap_err();
        assert_eq!(err, SkuBenchError::UnsortedInput { index: 2 });
    }

    #[test]
    fn test_sorted_view_searches() {
        let sorted = merge_sort(&records(&["c", "a", "e", "b", "d"]));
        let view = SortedView::try_new(&sorted).unwrap();
        assert_eq!(view.len(), 5);
        assert_eq!(view.binary_search("d").unwrap().key(), "d");
        assert_eq!(view.exponential_search("a").unwrap().key(), "a");
        assert!(view.exponential_search("z").is_none());
    }

    #[test]
    fn test_algorithm_metadata() {
        assert_eq!(SearchAlgorithm::Binary.name(), "Binary Search");
        assert!(!SearchAlgorithm::Linear.requires_sorted());
        assert!(SearchAlgorithm::Exponential.requires_sorted());
        assert_eq!(
            serde_json::to_string(&SearchAlgorithm::Exponential).unwrap(),
            "\"exponential\""
        );
    }
}
