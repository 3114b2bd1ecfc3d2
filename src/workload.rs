//! The ordered list of keys probed during a benchmark run.

use rand::prelude::*;
use serde::Serialize;

use crate::config::WorkloadConfig;
use crate::dataset::Dataset;
use crate::error::{SkuBenchError, SkuBenchResult};
use crate::record::Keyed;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryWorkload {
    keys: Vec<String>,
    absent_key: String,
}

impl QueryWorkload {
    /// Hot block, then random block (with replacement), then the absent key.
    pub fn build<R: Rng>(
        dataset: &Dataset,
        config: &WorkloadConfig,
        rng: &mut R,
    ) -> SkuBenchResult<Self> {
        if dataset.contains_key(&config.absent_key) {
            return Err(SkuBenchError::InvalidConfig(format!(
                "absent key '{}' is present in the dataset",
                config.absent_key
            )));
        }
        let records = dataset.unsorted();
        if records.is_empty() && (config.hot_queries > 0 || config.random_queries > 0) {
            return Err(SkuBenchError::InvalidConfig(
                "cannot draw queries from an empty dataset".to_string(),
            ));
        }

        let mut keys = Vec::with_capacity(config.total_queries());

        if config.hot_queries > 0 {
            let pool: Vec<&str> = records
                .choose_multiple(rng, config.hot_key_pool)
                .map(|r| r.key())
                .collect();
            keys.extend(
                pool.iter()
                    .cycle()
                    .take(config.hot_queries)
                    .map(|k| k.to_string()),
            );
        }

        for _ in 0..config.random_queries {
            let idx = rng.gen_range(0..records.len());
            keys.push(records[idx].key().to_string());
        }

        keys.push(config.absent_key.clone());

        Ok(QueryWorkload {
            keys,
            absent_key: config.absent_key.clone(),
        })
    }

    /// Build directly from caller-supplied present keys plus an absent key.
    pub fn from_keys<I, S>(present: I, absent_key: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys: Vec<String> = present.into_iter().map(Into::into).collect();
        keys.push(absent_key.to_string());
        QueryWorkload {
            keys,
            absent_key: absent_key.to_string(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn absent_key(&self) -> &str {
        &self.absent_key
    }

    /// Every query except the trailing absent key should hit.
    pub fn expected_found(&self) -> usize {
        self.keys.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::make_rng;
    use std::collections::HashSet;

    fn small_config() -> WorkloadConfig {
        WorkloadConfig {
            hot_key_pool: 3,
            hot_queries: 8,
            random_queries: 50,
            absent_key: "missing".to_string(),
        }
    }

    #[test]
    fn test_layout_and_expected_found() {
        let mut rng = make_rng(Some(11));
        let dataset = Dataset::generate(40, &mut rng);
        let workload = QueryWorkload::build(&dataset, &small_config(), &mut rng).unwrap();

        assert_eq!(workload.len(), 8 + 50 + 1);
        assert_eq!(workload.expected_found(), 58);
        assert_eq!(workload.keys().last().map(String::as_str), Some("missing"));
        for key in &workload.keys()[..58] {
            assert!(dataset.contains_key(key), "{} not in dataset", key);
        }
    }

    #[test]
    fn test_hot_block_cycles_pool() {
        let mut rng = make_rng(Some(5));
        let dataset = Dataset::generate(40, &mut rng);
        let workload = QueryWorkload::build(&dataset, &small_config(), &mut rng).unwrap();

        let hot = &workload.keys()[..8];
        let distinct: HashSet<&String> = hot.iter().collect();
        assert_eq!(distinct.len(), 3);
        assert_eq!(hot[0], hot[3]);
        assert_eq!(hot[1], hot[4]);
        assert_eq!(hot[2], hot[5]);
    }

    #[test]
    fn test_pool_larger_than_dataset_uses_every_key() {
        let dataset = Dataset::from_keys(["c", "a", "e", "b", "d"]);
        let config = WorkloadConfig {
            hot_key_pool: 7,
            hot_queries: 17,
            random_queries: 4,
            absent_key: "missing".to_string(),
        };
        let workload = QueryWorkload::build(&dataset, &config, &mut make_rng(Some(3))).unwrap();

        assert_eq!(workload.len(), 17 + 4 + 1);
        let hot: HashSet<&String> = workload.keys()[..17].iter().collect();
        assert_eq!(hot.len(), 5);
    }

    #[test]
    fn test_random_block_samples_with_replacement() {
        let mut rng = make_rng(Some(8));
        let dataset = Dataset::generate(2, &mut rng);
        let config = WorkloadConfig {
            hot_key_pool: 1,
            hot_queries: 0,
            random_queries: 30,
            absent_key: "missing".to_string(),
        };
        let workload = QueryWorkload::build(&dataset, &config, &mut rng).unwrap();
        let distinct: HashSet<&String> = workload.keys()[..30].iter().collect();
        assert!(distinct.len() <= 2);
    }

    #[test]
    fn test_absent_key_must_be_absent() {
        let dataset = Dataset::from_keys(["a", "b", "missing"]);
        let config = WorkloadConfig {
            hot_key_pool: 1,
            ..small_config()
        };
        let err = QueryWorkload::build(&dataset, &config, &mut make_rng(Some(1))).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_empty_dataset_needs_empty_workload() {
        let dataset = Dataset::from_keys(Vec::<String>::new());
        assert!(QueryWorkload::build(&dataset, &small_config(), &mut make_rng(Some(1))).is_err());

        let absent_only = WorkloadConfig {
            hot_key_pool: 0,
            hot_queries: 0,
            random_queries: 0,
            absent_key: "missing".to_string(),
        };
        let workload = QueryWorkload::build(&dataset, &absent_only, &mut make_rng(Some(1))).unwrap();
        assert_eq!(workload.keys(), ["missing".to_string()]);
        assert_eq!(workload.expected_found(), 0);
    }

    #[test]
    fn test_from_keys() {
        let workload = QueryWorkload::from_keys(["a", "d"], "z");
        assert_eq!(workload.len(), 3);
        assert_eq!(workload.absent_key(), "z");
        assert_eq!(workload.expected_found(), 2);
    }
}
