//! skubench - merge sort and search benchmarks over synthetic SKU records
//!
//! This crate generates a dataset of UUID-keyed records, sorts it with a
//! bottom-up merge sort, and times linear, binary and exponential search
//! against a query workload, writing the results to a plain-text report.

pub mod bench;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod record;
pub mod report;
pub mod search;
pub mod sort;
pub mod workload;

// Re-export commonly used types
pub use bench::{BenchmarkResult, DatasetView, Harness, Outcome};
pub use config::{BenchConfig, WorkloadConfig};
pub use dataset::Dataset;
pub use error::{SkuBenchError, SkuBenchResult};
pub use record::{Keyed, Record};
pub use report::BenchmarkReport;
pub use search::{binary_search, exponential_search, linear_search, SearchAlgorithm, SortedView};
pub use sort::merge_sort;
pub use workload::QueryWorkload;

const TARGET: &str = "skubench";

/// Generate the data, run every benchmark, and return the report without
/// writing anything.
pub fn run_benchmarks(config: &BenchConfig) -> SkuBenchResult<BenchmarkReport> {
    config.validate()?;

    let mut rng = dataset::make_rng(config.seed);
    let dataset = Dataset::generate(config.dataset_size, &mut rng);
    logging::debug(
        TARGET,
        "dataset generated",
        vec![logging::field("records", dataset.len())],
    );
    let workload = QueryWorkload::build(&dataset, &config.workload, &mut rng)?;
    logging::debug(
        TARGET,
        "workload built",
        vec![
            logging::field("queries", workload.len()),
            logging::field("expected_found", workload.expected_found()),
        ],
    );

    Ok(Harness::new(config).run_suite(&dataset, &workload))
}

/// Run the benchmarks and write the text report (and JSON, if configured).
pub fn run(config: &BenchConfig) -> SkuBenchResult<BenchmarkReport> {
    let report = run_benchmarks(config)?;

    report::write_report(&config.output, &report.render())?;
    logging::info(
        TARGET,
        "report written",
        vec![logging::field("path", config.output.display().to_string())],
    );

    if let Some(json_path) = &config.json_output {
        report::write_report(json_path, &report.to_json()?)?;
        logging::info(
            TARGET,
            "json report written",
            vec![logging::field("path", json_path.display().to_string())],
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_config(dir: &std::path::Path) -> BenchConfig {
        BenchConfig {
            dataset_size: 32,
            warmup_passes: 0,
            iterations: 1,
            workload: WorkloadConfig {
                hot_key_pool: 2,
                hot_queries: 3,
                random_queries: 10,
                ..WorkloadConfig::default()
            },
            seed: Some(1),
            output: dir.join("result.log"),
            json_output: Some(dir.join("result.json")),
        }
    }

    #[test]
    fn test_run_writes_both_reports() {
        let dir = tempfile::tempdir().unwrap();
        let config = tiny_config(dir.path());
        let report = run(&config).unwrap();

        let text = std::fs::read_to_string(&config.output).unwrap();
        assert_eq!(text, report.render());
        assert!(text.contains("Data Size: 32 items"));
        assert!(text.contains("Search Queries: 14 searches"));

        let json = std::fs::read_to_string(dir.path().join("result.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["results"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_run_rejects_invalid_config_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = BenchConfig {
            iterations: 0,
            ..tiny_config(dir.path())
        };
        assert!(matches!(run(&config), Err(SkuBenchError::InvalidConfig(_))));
        assert!(!config.output.exists());
    }

    #[test]
    fn test_run_on_five_records_with_stock_workload() {
        let dir = tempfile::tempdir().unwrap();
        let config = BenchConfig {
            dataset_size: 5,
            warmup_passes: 0,
            iterations: 1,
            seed: Some(2),
            output: dir.path().join("result.log"),
            ..BenchConfig::default()
        };
        let report = run(&config).unwrap();

        assert_eq!(report.data_size, 5);
        for result in &report.results[1..] {
            assert_eq!(
                result.outcome,
                Outcome::Search {
                    found: 17 + 10_000,
                    total: 17 + 10_000 + 1
                }
            );
        }
    }

    #[test]
    fn test_run_rejects_queries_on_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let config = BenchConfig {
            dataset_size: 0,
            ..tiny_config(dir.path())
        };
        assert!(matches!(run(&config), Err(SkuBenchError::InvalidConfig(_))));
        assert!(!config.output.exists());
    }

    #[test]
    fn test_run_benchmarks_is_reproducible_in_counts() {
        let dir = tempfile::tempdir().unwrap();
        let config = tiny_config(dir.path());
        let a = run_benchmarks(&config).unwrap();
        let b = run_benchmarks(&config).unwrap();
        let outcomes = |r: &BenchmarkReport| r.results.iter().map(|x| x.outcome).collect::<Vec<_>>();
        assert_eq!(outcomes(&a), outcomes(&b));
    }
}
