//! Run parameters for the benchmark.
//!
//! Every field has a default, so `BenchConfig::default()` reproduces the stock
//! run and a JSON config file only needs to name the fields it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SkuBenchError, SkuBenchResult};

pub const DEFAULT_DATASET_SIZE: usize = 10_000;
pub const DEFAULT_WARMUP_PASSES: usize = 3;
pub const DEFAULT_ITERATIONS: usize = 10;
pub const DEFAULT_HOT_KEY_POOL: usize = 7;
pub const DEFAULT_HOT_QUERIES: usize = 17;
pub const DEFAULT_RANDOM_QUERIES: usize = 10_000;
pub const DEFAULT_ABSENT_KEY: &str = "non-existent-sku-123";
pub const DEFAULT_OUTPUT: &str = "result.log";

/// How the query workload is put together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkloadConfig {
    /// Distinct dataset keys that make up the repeated "hot" block.
    pub hot_key_pool: usize,
    /// Length of the hot block; the pool is cycled to fill it.
    pub hot_queries: usize,
    /// Keys drawn uniformly from the dataset, with replacement.
    pub random_queries: usize,
    /// Appended last; must not occur in the dataset.
    pub absent_key: String,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        WorkloadConfig {
            hot_key_pool: DEFAULT_HOT_KEY_POOL,
            hot_queries: DEFAULT_HOT_QUERIES,
            random_queries: DEFAULT_RANDOM_QUERIES,
            absent_key: DEFAULT_ABSENT_KEY.to_string(),
        }
    }
}

impl WorkloadConfig {
    /// Number of keys the workload will hold, absent key included.
    pub fn total_queries(&self) -> usize {
        self.hot_queries + self.random_queries + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    pub dataset_size: usize,
    pub warmup_passes: usize,
    pub iterations: usize,
    pub workload: WorkloadConfig,
    /// Fixes the dataset and workload for reproducible runs.
    pub seed: Option<u64>,
    pub output: PathBuf,
    pub json_output: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            dataset_size: DEFAULT_DATASET_SIZE,
            warmup_passes: DEFAULT_WARMUP_PASSES,
            iterations: DEFAULT_ITERATIONS,
            workload: WorkloadConfig::default(),
            seed: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            json_output: None,
        }
    }
}

impl BenchConfig {
    pub fn from_json_str(source: &str, origin: &str) -> SkuBenchResult<Self> {
        serde_json::from_str(source).map_err(|e| SkuBenchError::ConfigParse {
            path: origin.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn from_json_file(path: &Path) -> SkuBenchResult<Self> {
        let source = fs::read_to_string(path).map_err(|e| SkuBenchError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&source, &path.display().to_string())
    }

    pub fn validate(&self) -> SkuBenchResult<()> {
        if self.iterations == 0 {
            return Err(SkuBenchError::InvalidConfig(
                "iterations must be at least 1".to_string(),
            ));
        }
        if self.workload.hot_queries > 0 && self.workload.hot_key_pool == 0 {
            return Err(SkuBenchError::InvalidConfig(
                "hot_key_pool must be at least 1 when hot_queries is set".to_string(),
            ));
        }
        if self.output.as_os_str().is_empty() {
            return Err(SkuBenchError::InvalidConfig(
                "output path is empty".to_string(),
            ));
        }
        Ok(())
    }
}
