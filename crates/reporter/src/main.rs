//! loadscope reporter - turns captured page-load runs into report artifacts
//!
//! Each run directory is processed independently; runs are fanned out over
//! the blocking thread pool.

use anyhow::{Context, Result};
use clap::Parser;
use report_lib::{BrowserEngine, ReportPipeline, RunOutcome};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

const REPORTER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "loadscope-reporter")]
#[command(version, about = "Build page-load reports from captured run directories")]
struct Args {
    /// Configuration file (JSON, TOML or YAML)
    #[arg(short, long, env = "LOADSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Browser engine the runs were captured with
    #[arg(long)]
    engine: Option<BrowserEngine>,

    /// Total blocking time measured externally (ms)
    #[arg(long)]
    tbt_ms: Option<f64>,

    /// Run directories to process
    #[arg(required = true)]
    run_dirs: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let args = Args::parse();
    info!(version = REPORTER_VERSION, runs = args.run_dirs.len(), "Starting loadscope-reporter");

    let mut config = config::ReporterConfig::load(args.config.as_deref())?;
    if let Some(engine) = args.engine {
        config.run.engine = engine;
    }
    if args.tbt_ms.is_some() {
        config.run.total_blocking_time_ms = args.tbt_ms;
    }
    config.run.validate().context("Invalid run configuration")?;
    info!(
        engine = %config.run.engine,
        max_parallel_runs = config.max_parallel_runs,
        policies = config.run.interception.policies.len(),
        "Reporter configured"
    );

    let pipeline = Arc::new(ReportPipeline::new(config.run));
    let results = process_runs(pipeline, args.run_dirs, config.max_parallel_runs).await;

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    for (run_dir, result) in &results {
        match result {
            Ok(outcome) => info!(
                run = %run_dir.display(),
                requests = outcome.request_count,
                merged_samples = outcome.merged_samples,
                network_data = outcome.has_network_data,
                "Run complete"
            ),
            Err(e) => error!(run = %run_dir.display(), error = %e, "Run failed"),
        }
    }

    info!(total = results.len(), failed, "Finished");
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Process every run directory, at most `max_parallel` at a time
///
/// Results come back in input order.
async fn process_runs(
    pipeline: Arc<ReportPipeline>,
    run_dirs: Vec<PathBuf>,
    max_parallel: usize,
) -> Vec<(PathBuf, Result<RunOutcome>)> {
    let permits = Arc::new(Semaphore::new(max_parallel.max(1)));
    let mut tasks = JoinSet::new();

    for (index, run_dir) in run_dirs.iter().cloned().enumerate() {
        let pipeline = Arc::clone(&pipeline);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            let result = tokio::task::spawn_blocking(move || pipeline.run(&run_dir))
                .await
                .context("Run task panicked")
                .and_then(|r| r.map_err(anyhow::Error::from));
            (index, result)
        });
    }

    let mut results: Vec<Option<Result<RunOutcome>>> = run_dirs.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(e) => error!(error = %e, "Run task aborted"),
        }
    }

    run_dirs
        .into_iter()
        .zip(results)
        .map(|(dir, result)| {
            let result = result.unwrap_or_else(|| Err(anyhow::anyhow!("run task did not complete")));
            (dir, result)
        })
        .collect()
}
