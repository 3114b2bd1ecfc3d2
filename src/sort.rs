//! Bottom-up iterative merge sort.
//!
//! The sorter never touches its input: it copies into a working buffer, then
//! merges adjacent runs of width 1, 2, 4, ... into a single scratch buffer,
//! swapping the two buffers after every full pass.

use crate::record::Keyed;

/// Return a new vector holding `items` in ascending key order.
///
/// Stable, O(n log n) comparisons, one scratch buffer of length n allocated
/// once for the whole sort.
pub fn merge_sort<T: Keyed + Clone>(items: &[T]) -> Vec<T> {
    let len = items.len();
    let mut result = items.to_vec();
    if len <= 1 {
        return result;
    }

    let mut scratch = items.to_vec();
    let mut width = 1;
    while width < len {
        let mut left = 0;
        while left < len {
            let mid = (left + width).min(len);
            let right = (left + 2 * width).min(len);
            merge_runs(&result, &mut scratch, left, mid, right);
            left += 2 * width;
        }
        std::mem::swap(&mut result, &mut scratch);
        width *= 2;
    }

    result
}

/// Merge the sorted runs `source[left..mid]` and `source[mid..right]` into
/// `target[left..right]`. Equal keys take the left run first.
pub fn merge_runs<T: Keyed + Clone>(
    source: &[T],
    target: &mut [T],
    left: usize,
    mid: usize,
    right: usize,
) {
    let (mut i, mut j, mut k) = (left, mid, left);

    while i < mid && j < right {
        if source[i].key() <= source[j].key() {
            target[k] = source[i].clone();
            i += 1;
        } else {
            target[k] = source[j].clone();
            j += 1;
        }
        k += 1;
    }

    while i < mid {
        target[k] = source[i].clone();
        i += 1;
        k += 1;
    }
    while j < right {
        target[k] = source[j].clone();
        j += 1;
        k += 1;
    }
}

pub fn is_sorted_by_key<T: Keyed>(items: &[T]) -> bool {
    first_unsorted_index(items).is_none()
}

/// Index of the first element whose key is smaller than its predecessor's.
pub fn first_unsorted_index<T: Keyed>(items: &[T]) -> Option<usize> {
    items
        .windows(2)
        .position(|w| w[0].key() > w[1].key())
        .map(|i| i + 1)
}
