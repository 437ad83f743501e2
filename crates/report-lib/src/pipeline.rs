//! End-to-end processing of one run directory
//!
//! collect → merge → build → render. Everything before rendering degrades
//! missing or malformed inputs to absence; only writing the artifacts can
//! fail the run.

use crate::collector::{DirectoryTelemetrySource, RunInputs, TelemetrySource};
use crate::config::RunConfig;
use crate::error::Result;
use crate::merge::TelemetryMerger;
use crate::observability::{stage, PipelineMetrics, StructuredLogger};
use crate::render::{write_artifact, JsonModelRenderer, ReportRenderer};
use crate::report::{winning_lcp, ReportDataBuilder, ReportModel, ReportSources};
use std::path::{Path, PathBuf};
use tracing::debug;

/// What a successful run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub run_dir: PathBuf,
    /// Files written by the renderers, in renderer order
    pub written: Vec<PathBuf>,
    pub metrics_path: PathBuf,
    pub request_count: usize,
    pub merged_samples: usize,
    pub unmatched_samples: usize,
    pub has_network_data: bool,
}

struct Observers<'a> {
    metrics: &'a PipelineMetrics,
    logger: &'a StructuredLogger,
}

struct Assembled {
    model: ReportModel,
    merged_samples: usize,
    unmatched_samples: usize,
}

/// Report pipeline for runs captured under one configuration
pub struct ReportPipeline {
    config: RunConfig,
    renderers: Vec<Box<dyn ReportRenderer>>,
}

impl ReportPipeline {
    /// Pipeline with the JSON model renderer
    pub fn new(config: RunConfig) -> Self {
        let model_renderer = JsonModelRenderer::new(config.artifacts.model_output.clone());
        Self {
            config,
            renderers: vec![Box::new(model_renderer)],
        }
    }

    pub fn with_renderer(mut self, renderer: impl ReportRenderer + 'static) -> Self {
        self.renderers.push(Box::new(renderer));
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Collect a run directory's inputs
    pub fn collect(&self, run_dir: &Path) -> RunInputs {
        DirectoryTelemetrySource::new(run_dir, self.config.artifacts.clone()).collect()
    }

    /// Build the model for already-collected inputs without writing anything
    pub fn build_model(&self, inputs: RunInputs) -> ReportModel {
        self.assemble(inputs, None).model
    }

    /// Process a run directory and write its artifacts into it
    pub fn run(&self, run_dir: &Path) -> Result<RunOutcome> {
        let logger = StructuredLogger::new(run_dir);
        logger.log_run_started(self.config.engine.as_str());

        let result = self.run_observed(run_dir, &logger);
        if let Err(e) = &result {
            logger.log_run_failed(e);
        }
        result
    }

    fn run_observed(&self, run_dir: &Path, logger: &StructuredLogger) -> Result<RunOutcome> {
        let metrics = PipelineMetrics::new()?;
        let observers = Observers {
            metrics: &metrics,
            logger,
        };

        let inputs = metrics.time_stage(stage::COLLECT, || self.collect(run_dir));
        let assembled = self.assemble(inputs, Some(&observers));
        let model = &assembled.model;

        let mut written = Vec::with_capacity(self.renderers.len());
        for renderer in &self.renderers {
            let path = metrics.time_stage(stage::RENDER, || renderer.render(model, run_dir))?;
            debug!(renderer = renderer.name(), path = %path.display(), "Renderer finished");
            logger.log_report_written(&path);
            written.push(path);
        }

        let metrics_path = run_dir.join(&self.config.artifacts.metrics_output);
        write_artifact(&metrics_path, metrics.encode()?.as_bytes())?;
        logger.log_report_written(&metrics_path);

        Ok(RunOutcome {
            run_dir: run_dir.to_path_buf(),
            written,
            metrics_path,
            request_count: model.waterfall.rows.len(),
            merged_samples: assembled.merged_samples,
            unmatched_samples: assembled.unmatched_samples,
            has_network_data: model.has_network_data,
        })
    }

    fn assemble(&self, inputs: RunInputs, observers: Option<&Observers<'_>>) -> Assembled {
        let RunInputs {
            archive,
            timing_samples,
            metrics,
            console,
            artifacts,
        } = inputs;

        let lcp_url = metrics
            .as_ref()
            .and_then(|m| winning_lcp(&m.lcp))
            .and_then(|entry| entry.url.as_deref());

        let merge = || archive.map(|a| TelemetryMerger::merge(a, &timing_samples, lcp_url));
        let outcome = match observers {
            Some(obs) => obs.metrics.time_stage(stage::MERGE, merge),
            None => merge(),
        };

        let (merged_samples, unmatched_samples) = match &outcome {
            Some(o) => (o.merged_samples, o.unmatched_samples),
            None => (0, timing_samples.len()),
        };

        if let Some(obs) = observers {
            match &outcome {
                Some(o) => {
                    obs.metrics
                        .set_merge_counts(o.records.len(), merged_samples, unmatched_samples);
                    obs.logger
                        .log_telemetry_merged(o.records.len(), merged_samples, unmatched_samples);
                }
                None => {
                    obs.metrics.set_merge_counts(0, 0, unmatched_samples);
                    obs.logger.log_network_missing();
                }
            }
            obs.metrics.set_network_data_present(outcome.is_some());
        }

        let build = || {
            ReportDataBuilder::new(&self.config).build(ReportSources {
                records: outcome.as_ref().map(|o| o.records.as_slice()),
                metrics: metrics.as_ref(),
                console: console.as_deref().unwrap_or_default(),
                artifacts: Some(&artifacts),
            })
        };
        let model = match observers {
            Some(obs) => obs.metrics.time_stage(stage::BUILD, build),
            None => build(),
        };

        if let Some(obs) = observers {
            obs.metrics.set_layout_shifts(model.layout_shifts.len());
            obs.metrics.set_console_messages(model.console_summary.total);
            obs.logger.log_vitals_computed(&model.vitals);
        }

        Assembled {
            model,
            merged_samples,
            unmatched_samples,
        }
    }
}
