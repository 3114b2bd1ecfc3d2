//! Timed runs of the sorter and the search algorithms.

use std::hint::black_box;
use std::rc::Rc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use crate::config::BenchConfig;
use crate::dataset::Dataset;
use crate::logging::{self, field, ms_field};
use crate::record::{Keyed, Record};
use crate::report::BenchmarkReport;
use crate::search::{binary_search, exponential_search, linear_search, SearchAlgorithm};
use crate::sort::merge_sort;
use crate::workload::QueryWorkload;

const TARGET: &str = "skubench::bench";

/// Which ordering of the dataset a run searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetView {
    Unsorted,
    Sorted,
}

impl DatasetView {
    pub fn name(self) -> &'static str {
        match self {
            DatasetView::Unsorted => "unsorted",
            DatasetView::Sorted => "sorted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Sort { items: usize },
    Search { found: usize, total: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub name: String,
    pub view: DatasetView,
    /// Wall-clock time of one pass, averaged over the timed repetitions.
    pub total_time_ms: f64,
    /// `total_time_ms` divided by the number of lookups (or items sorted).
    pub avg_time_ms: f64,
    pub outcome: Outcome,
}

impl BenchmarkResult {
    pub fn found(&self) -> Option<usize> {
        match self.outcome {
            Outcome::Search { found, .. } => Some(found),
            Outcome::Sort { .. } => None,
        }
    }

    /// Found lookups as a percentage, `None` for sort results.
    pub fn success_rate(&self) -> Option<f64> {
        match self.outcome {
            Outcome::Search { total: 0, .. } => Some(0.0),
            Outcome::Search { found, total } => Some(found as f64 / total as f64 * 100.0),
            Outcome::Sort { .. } => None,
        }
    }
}

/// A workload key on which the algorithms returned different records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Disagreement {
    pub key: String,
    pub linear: Option<String>,
    pub binary: Option<String>,
    pub exponential: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Harness {
    warmup_passes: usize,
    iterations: usize,
}

impl Harness {
    pub fn new(config: &BenchConfig) -> Self {
        Harness {
            warmup_passes: config.warmup_passes,
            iterations: config.iterations.max(1),
        }
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn warmup_passes(&self) -> usize {
        self.warmup_passes
    }

    /// Time `algorithm` over the whole workload against `data`.
    ///
    /// Warm-up passes run untimed first. The found count comes from the last
    /// timed pass.
    pub fn run_search<T: Keyed>(
        &self,
        name: &str,
        view: DatasetView,
        algorithm: SearchAlgorithm,
        data: &[T],
        workload: &QueryWorkload,
    ) -> BenchmarkResult {
        logging::debug(
            TARGET,
            "warming up",
            vec![field("benchmark", name), field("passes", self.warmup_passes)],
        );
        for _ in 0..self.warmup_passes {
            for key in workload.keys() {
                black_box(algorithm.search(data, key));
            }
        }

        let mut total_ms = 0.0;
        let mut found = 0;
        for _ in 0..self.iterations {
            let start = Instant::now();
            let mut local_found = 0;
            for key in workload.keys() {
                if black_box(algorithm.search(data, key)).is_some() {
                    local_found += 1;
                }
            }
            total_ms += start.elapsed().as_secs_f64() * 1000.0;
            found = local_found;
        }

        let time_ms = total_ms / self.iterations as f64;
        let total = workload.len();
        let result = BenchmarkResult {
            name: name.to_string(),
            view,
            total_time_ms: time_ms,
            avg_time_ms: if total == 0 { 0.0 } else { time_ms / total as f64 },
            outcome: Outcome::Search { found, total },
        };

        logging::info(
            TARGET,
            "search benchmark finished",
            vec![
                field("benchmark", name),
                field("view", view.name()),
                ms_field("time_ms", result.total_time_ms),
                field("found", found),
                field("total", total),
            ],
        );
        result
    }

    /// A single timed merge sort of the unsorted view.
    pub fn run_sort(&self, dataset: &Dataset) -> BenchmarkResult {
        let items = dataset.len();
        let start = Instant::now();
        let sorted = black_box(merge_sort(dataset.unsorted()));
        let time_ms = start.elapsed().as_secs_f64() * 1000.0;
        drop(sorted);

        let result = BenchmarkResult {
            name: "Merge Sort".to_string(),
            view: DatasetView::Unsorted,
            total_time_ms: time_ms,
            avg_time_ms: if items == 0 { 0.0 } else { time_ms / items as f64 },
            outcome: Outcome::Sort { items },
        };

        logging::info(
            TARGET,
            "sort benchmark finished",
            vec![field("items", items), ms_field("time_ms", time_ms)],
        );
        result
    }

    /// The full set of benchmarks, in report order.
    pub fn run_suite(&self, dataset: &Dataset, workload: &QueryWorkload) -> BenchmarkReport {
        logging::info(
            TARGET,
            "running performance tests",
            vec![
                field("data_size", dataset.len()),
                field("queries", workload.len()),
            ],
        );

        let disagreements = verify_agreement(dataset, workload);
        for d in &disagreements {
            logging::warn(
                TARGET,
                "search algorithms disagree",
                vec![
                    field("key", d.key.as_str()),
                    field("linear", d.linear.clone()),
                    field("binary", d.binary.clone()),
                    field("exponential", d.exponential.clone()),
                ],
            );
        }

        let unsorted = dataset.unsorted();
        let sorted = dataset.sorted();
        let results = vec![
            self.run_sort(dataset),
            self.run_search(
                "Linear Search (unsorted)",
                DatasetView::Unsorted,
                SearchAlgorithm::Linear,
                unsorted,
                workload,
            ),
            self.run_search(
                "Linear Search (sorted)",
                DatasetView::Sorted,
                SearchAlgorithm::Linear,
                sorted,
                workload,
            ),
            self.run_search(
                SearchAlgorithm::Binary.name(),
                DatasetView::Sorted,
                SearchAlgorithm::Binary,
                sorted,
                workload,
            ),
            self.run_search(
                SearchAlgorithm::Exponential.name(),
                DatasetView::Sorted,
                SearchAlgorithm::Exponential,
                sorted,
                workload,
            ),
        ];

        BenchmarkReport {
            generated_at: Utc::now(),
            data_size: dataset.len(),
            query_count: workload.len(),
            warmup_passes: self.warmup_passes,
            iterations: self.iterations,
            disagreements: disagreements.len(),
            results,
        }
    }
}

/// Check that linear search on the unsorted view and binary/exponential
/// search on the sorted view return the same record for every workload key.
pub fn verify_agreement(dataset: &Dataset, workload: &QueryWorkload) -> Vec<Disagreement> {
    let unsorted = dataset.unsorted();
    let sorted = dataset.sorted();
    let mut disagreements = Vec::new();

    for key in workload.keys() {
        let linear = linear_search(unsorted, key);
        let binary = binary_search(sorted, key);
        let exponential = exponential_search(sorted, key);
        if !same_record(linear, binary) || !same_record(linear, exponential) {
            disagreements.push(Disagreement {
                key: key.clone(),
                linear: linear.map(|r| r.key().to_string()),
                binary: binary.map(|r| r.key().to_string()),
                exponential: exponential.map(|r| r.key().to_string()),
            });
        }
    }
    disagreements
}

fn same_record(a: Option<&Rc<Record>>, b: Option<&Rc<Record>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
