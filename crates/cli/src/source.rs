//! Locating the report model of a run directory

use anyhow::{bail, Context, Result};
use report_lib::{BrowserEngine, ReportModel, ReportPipeline, RunConfig};
use std::path::Path;

/// Where a model came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelOrigin {
    /// Read from the reporter's output
    Written,
    /// Built in memory from the raw artifacts
    Rebuilt,
}

/// Load the written model, or build one from raw artifacts without writing
pub fn load_model(
    run_dir: &Path,
    engine: BrowserEngine,
    rebuild: bool,
) -> Result<(ReportModel, ModelOrigin)> {
    if !run_dir.is_dir() {
        bail!("Run directory {} does not exist", run_dir.display());
    }

    let config = RunConfig::default().with_engine(engine);
    let model_path = run_dir.join(&config.artifacts.model_output);

    if !rebuild && model_path.is_file() {
        let content = std::fs::read(&model_path)
            .with_context(|| format!("Failed to read {}", model_path.display()))?;
        let model = serde_json::from_slice(&content)
            .with_context(|| format!("Failed to parse {}", model_path.display()))?;
        return Ok((model, ModelOrigin::Written));
    }

    let pipeline = ReportPipeline::new(config);
    let model = pipeline.build_model(pipeline.collect(run_dir));
    Ok((model, ModelOrigin::Rebuilt))
}
