//! Rendering and writing the benchmark report.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::bench::{BenchmarkResult, Outcome};
use crate::error::{SkuBenchError, SkuBenchResult};

pub const REPORT_TITLE: &str = "=== Search Algorithm Performance Test Results ===";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub generated_at: DateTime<Utc>,
    pub data_size: usize,
    pub query_count: usize,
    pub warmup_passes: usize,
    pub iterations: usize,
    /// Workload keys on which the search algorithms disagreed.
    pub disagreements: usize,
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    /// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
    pub fn test_date(&self) -> String {
        self.generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", REPORT_TITLE);
        let _ = writeln!(out, "Test Date: {}", self.test_date());
        let _ = writeln!(out, "Data Size: {} items", self.data_size);
        let _ = writeln!(out, "Search Queries: {} searches", self.query_count);
        let _ = writeln!(out, "Warm-up Passes: {}", self.warmup_passes);
        let _ = writeln!(out, "Timed Iterations: {}", self.iterations);
        if self.disagreements > 0 {
            let _ = writeln!(out, "Disagreements: {}", self.disagreements);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Results:");
        for result in &self.results {
            let _ = writeln!(out);
            out.push_str(&render_block(result));
        }
        out
    }

    pub fn to_json(&self) -> SkuBenchResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SkuBenchError::ReportSerialize(e.to_string()))
    }
}

/// One timing block, as it appears under `Results:`.
pub fn render_block(result: &BenchmarkResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}:", result.name);
    let _ = writeln!(out, "  Total Time: {:.3}ms", result.total_time_ms);
    match result.outcome {
        Outcome::Search { found, total } => {
            let _ = writeln!(
                out,
                "  Success Rate: {}/{} ({:.1}%)",
                found,
                total,
                result.success_rate().unwrap_or(0.0)
            );
            let _ = writeln!(
                out,
                "  Average Time per Search: {:.6}ms",
                result.avg_time_ms
            );
        }
        Outcome::Sort { items } => {
            let _ = writeln!(out, "  Items Sorted: {}", items);
            let _ = writeln!(out, "  Average Time per Item: {:.6}ms", result.avg_time_ms);
        }
    }
    out
}

/// Replace `path` with `contents` in one step.
///
/// The bytes go to a temporary file in the destination directory which is
/// renamed over `path` only after a successful write and flush, so a failed
/// run leaves any previous report intact.
pub fn write_report(path: &Path, contents: &str) -> SkuBenchResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| write_error(path, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| write_error(path, e))?;
    file.flush().map_err(|e| write_error(path, e))?;
    file.persist(path).map_err(|e| write_error(path, e.error))?;
    Ok(())
}

fn write_error(path: &Path, err: io::Error) -> SkuBenchError {
    SkuBenchError::ReportWrite {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
