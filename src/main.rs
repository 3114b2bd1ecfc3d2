use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use colored::*;

use skubench::bench::{BenchmarkResult, Outcome};
use skubench::logging::{self, LogFormat, LogSink};
use skubench::{BenchConfig, SkuBenchError, SkuBenchResult};

/// Merge sort and search benchmark over synthetic SKU records.
///
/// With no arguments, runs the stock benchmark and writes result.log.
#[derive(Parser)]
#[command(name = "skubench")]
#[command(version = "0.1.0")]
#[command(about = "Benchmark merge sort and linear/binary/exponential search", long_about = None)]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of records to generate
    #[arg(long)]
    size: Option<usize>,

    /// Number of randomly sampled queries
    #[arg(long)]
    queries: Option<usize>,

    /// Untimed warm-up passes per algorithm
    #[arg(long)]
    warmup: Option<usize>,

    /// Timed repetitions per algorithm
    #[arg(long)]
    iterations: Option<usize>,

    /// Seed for reproducible datasets and workloads
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the text report
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Also write the report as JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Log filter, e.g. `info` or `warn,skubench::bench=debug`
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log output format: text, json or compact
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Send log lines to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Only print the final save line
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        logging::error(
            "skubench",
            "benchmark run failed",
            vec![
                logging::field("kind", e.kind()),
                logging::field("error", e.to_string()),
            ],
        );
        eprintln!("{} {}", "Error during execution:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> SkuBenchResult<()> {
    setup_logging(&cli.log_level, &cli.log_format, cli.log_file.as_deref())?;
    let config = build_config(&cli)?;

    if !cli.quiet {
        println!("\n{}", "=== Running Performance Tests ===".cyan().bold());
        println!("Data Size: {} items", config.dataset_size);
        println!(
            "Search Queries: {} searches",
            config.workload.total_queries()
        );
    }

    let report = skubench::run(&config)?;

    if !cli.quiet {
        println!("\n{}", "Performance Results:".cyan().bold());
        for result in &report.results {
            print_result(result);
        }
        if report.disagreements > 0 {
            println!(
                "\n{} {} workload keys",
                "Search algorithms disagreed on".yellow().bold(),
                report.disagreements
            );
        }
    }

    println!(
        "\n{} {}",
        "Results saved to".green().bold(),
        config.output.display()
    );
    if let Some(json) = &config.json_output {
        println!("{} {}", "JSON saved to".green().bold(), json.display());
    }
    Ok(())
}

fn setup_logging(filter: &str, format: &str, file: Option<&Path>) -> SkuBenchResult<()> {
    logging::set_filter(filter)?;
    let format = LogFormat::parse(format)
        .ok_or_else(|| SkuBenchError::LogFilter(format!("unknown log format '{}'", format)))?;
    let sink = match file {
        Some(path) => LogSink::File {
            path: path.display().to_string(),
            file: None,
        },
        None => LogSink::Stderr,
    };
    logging::configure(format, vec![sink]);
    Ok(())
}

fn build_config(cli: &Cli) -> SkuBenchResult<BenchConfig> {
    let mut config = match &cli.config {
        Some(path) => BenchConfig::from_json_file(path)?,
        None => BenchConfig::default(),
    };

    if let Some(size) = cli.size {
        config.dataset_size = size;
    }
    if let Some(queries) = cli.queries {
        config.workload.random_queries = queries;
    }
    if let Some(warmup) = cli.warmup {
        config.warmup_passes = warmup;
    }
    if let Some(iterations) = cli.iterations {
        config.iterations = iterations;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if cli.json.is_some() {
        config.json_output = cli.json.clone();
    }

    config.validate()?;
    Ok(config)
}

fn print_result(result: &BenchmarkResult) {
    println!("\n  {}:", result.name.bold());
    println!("    Total Time: {:.3}ms", result.total_time_ms);
    match result.outcome {
        Outcome::Search { found, total } => {
            let rate = format!("{}/{}", found, total);
            let rate = if found + 1 >= total {
                rate.green()
            } else {
                rate.yellow()
            };
            println!("    Found: {}", rate);
            println!("    Avg per search: {:.6}ms", result.avg_time_ms);
        }
        Outcome::Sort { items } => {
            println!("    Items: {}", items);
            println!("    Avg per item: {:.6}ms", result.avg_time_ms);
        }
    }
}
