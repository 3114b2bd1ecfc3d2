//! Synthetic SKU dataset and its two views.

use std::rc::Rc;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::error::SkuBenchResult;
use crate::record::{Keyed, Record};
use crate::search::SortedView;
use crate::sort::merge_sort;

/// RNG for dataset and workload generation: seeded when reproducibility is
/// wanted, from OS entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Draw a random version 4 UUID from `rng`.
pub fn next_uuid<R: RngCore>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    Uuid::from_bytes(bytes)
}

/// `count` records keyed by fresh hyphenated UUIDs. Collisions are not checked.
pub fn generate_records<R: RngCore>(count: usize, rng: &mut R) -> Vec<Record> {
    (0..count)
        .map(|_| Record::new(next_uuid(rng).hyphenated().to_string()))
        .collect()
}

/// The records under test, in generation order and in key order.
///
/// Both views share the same `Rc<Record>` handles.
#[derive(Debug, Clone)]
pub struct Dataset {
    unsorted: Vec<Rc<Record>>,
    sorted: Vec<Rc<Record>>,
}

impl Dataset {
    pub fn generate<R: RngCore>(count: usize, rng: &mut R) -> Self {
        Self::from_records(generate_records(count, rng))
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_records(keys.into_iter().map(Record::new).collect())
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        let unsorted: Vec<Rc<Record>> = records.into_iter().map(Rc::new).collect();
        let sorted = merge_sort(&unsorted);
        Dataset { unsorted, sorted }
    }

    pub fn len(&self) -> usize {
        self.unsorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unsorted.is_empty()
    }

    pub fn unsorted(&self) -> &[Rc<Record>] {
        &self.unsorted
    }

    pub fn sorted(&self) -> &[Rc<Record>] {
        &self.sorted
    }

    pub fn sorted_view(&self) -> SortedView<'_, Rc<Record>> {
        SortedView::trusted(&self.sorted)
    }

    /// Re-check the sorted view; fails only if a key is smaller than the one
    /// before it. Equal neighbouring keys pass.
    pub fn checked_sorted_view(&self) -> SkuBenchResult<SortedView<'_, Rc<Record>>> {
        SortedView::try_new(&self.sorted)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.sorted_view().binary_search(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.unsorted.iter().map(|r| r.key())
    }
}
