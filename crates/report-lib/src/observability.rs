//! Observability for report runs
//!
//! Provides:
//! - Prometheus metrics per run (stage latency, input sizes), exported in the
//!   text exposition format next to the report
//! - Structured logging of pipeline milestones with tracing

use crate::error::Result;
use crate::report::WebVitals;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntGauge, Registry, TextEncoder};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Histogram buckets for stage latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Pipeline stages timed by [`PipelineMetrics`]
pub mod stage {
    pub const COLLECT: &str = "collect";
    pub const MERGE: &str = "merge";
    pub const BUILD: &str = "build";
    pub const RENDER: &str = "render";
}

/// Metrics for a single run
///
/// Each instance owns its registry, so concurrent runs never share series.
pub struct PipelineMetrics {
    registry: Registry,
    stage_latency_seconds: HistogramVec,
    archive_entries: IntGauge,
    merged_samples: IntGauge,
    unmatched_samples: IntGauge,
    layout_shifts: IntGauge,
    console_messages: IntGauge,
    network_data_present: IntGauge,
}

impl PipelineMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let stage_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "loadscope_stage_latency_seconds",
                "Time spent in each report pipeline stage",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
            &["stage"],
        )?;
        registry.register(Box::new(stage_latency_seconds.clone()))?;

        let gauge = |name: &str, help: &str| -> Result<IntGauge> {
            let g = IntGauge::new(name, help)?;
            registry.register(Box::new(g.clone()))?;
            Ok(g)
        };

        Ok(Self {
            archive_entries: gauge(
                "loadscope_archive_entries",
                "Number of entries in the network archive",
            )?,
            merged_samples: gauge(
                "loadscope_merged_samples",
                "Live timing samples merged into archive entries",
            )?,
            unmatched_samples: gauge(
                "loadscope_unmatched_samples",
                "Live timing samples without a matching archive entry",
            )?,
            layout_shifts: gauge("loadscope_layout_shifts", "Layout-shift events in the run")?,
            console_messages: gauge("loadscope_console_messages", "Console messages captured")?,
            network_data_present: gauge(
                "loadscope_network_data_present",
                "1 when the run had a usable network archive",
            )?,
            stage_latency_seconds,
            registry,
        })
    }

    /// Record how long a stage took
    pub fn observe_stage(&self, stage: &str, duration_secs: f64) {
        self.stage_latency_seconds
            .with_label_values(&[stage])
            .observe(duration_secs);
    }

    /// Run `f` and record its duration under `stage`
    pub fn time_stage<T>(&self, stage: &str, f: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let out = f();
        self.observe_stage(stage, started.elapsed().as_secs_f64());
        out
    }

    pub fn set_merge_counts(&self, entries: usize, merged: usize, unmatched: usize) {
        self.archive_entries.set(entries as i64);
        self.merged_samples.set(merged as i64);
        self.unmatched_samples.set(unmatched as i64);
    }

    pub fn set_network_data_present(&self, present: bool) {
        self.network_data_present.set(i64::from(present));
    }

    pub fn set_layout_shifts(&self, count: usize) {
        self.layout_shifts.set(count as i64);
    }

    pub fn set_console_messages(&self, count: usize) {
        self.console_messages.set(count as i64);
    }

    /// Text exposition of every metric in this run's registry
    pub fn encode(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Structured logger for pipeline milestones
///
/// Every event carries an `event` field and the run directory.
#[derive(Clone)]
pub struct StructuredLogger {
    run: String,
}

impl StructuredLogger {
    pub fn new(run_dir: &Path) -> Self {
        Self {
            run: run_dir.display().to_string(),
        }
    }

    pub fn log_run_started(&self, engine: &str) {
        info!(
            event = "run_started",
            run = %self.run,
            engine = %engine,
            "Processing run"
        );
    }

    pub fn log_network_missing(&self) {
        warn!(
            event = "network_missing",
            run = %self.run,
            "No network data for run, waterfall will be empty"
        );
    }

    pub fn log_telemetry_merged(&self, entries: usize, merged: usize, unmatched: usize) {
        info!(
            event = "telemetry_merged",
            run = %self.run,
            entries = entries,
            merged_samples = merged,
            unmatched_samples = unmatched,
            "Merged live timing samples"
        );
    }

    pub fn log_vitals_computed(&self, vitals: &WebVitals) {
        info!(
            event = "vitals_computed",
            run = %self.run,
            ttfb_ms = ?vitals.ttfb.value,
            fcp_ms = ?vitals.fcp.value,
            lcp_ms = ?vitals.lcp.value,
            lcp_rating = ?vitals.lcp.rating.map(|r| r.as_str()),
            cls = ?vitals.cls.value,
            "Computed web vitals"
        );
    }

    pub fn log_report_written(&self, path: &Path) {
        info!(
            event = "report_written",
            run = %self.run,
            path = %path.display(),
            "Wrote report artifact"
        );
    }

    pub fn log_run_failed(&self, error: &dyn std::fmt::Display) {
        warn!(
            event = "run_failed",
            run = %self.run,
            error = %error,
            "Run failed"
        );
    }
}
