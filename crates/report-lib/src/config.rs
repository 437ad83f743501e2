//! Run configuration
//!
//! Everything a pipeline component needs to know about the environment it was
//! started in is carried by [`RunConfig`]. The binaries build it once at
//! startup (from files, environment and flags) and hand it down by reference;
//! nothing in this crate reads the process environment.

use crate::error::{PipelineError, Result};
use crate::intercept::InterceptionPlan;
use serde::{Deserialize, Serialize};

/// Browser engine the run was captured with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserEngine {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserEngine::Chromium => "chromium",
            BrowserEngine::Firefox => "firefox",
            BrowserEngine::Webkit => "webkit",
        }
    }

    /// Whether the engine emits `layout-shift` entries at all. Without them
    /// a zero CLS would be a false "Good".
    pub fn reports_layout_shifts(&self) -> bool {
        matches!(self, BrowserEngine::Chromium)
    }
}

impl std::fmt::Display for BrowserEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BrowserEngine {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserEngine::Chromium),
            "firefox" => Ok(BrowserEngine::Firefox),
            "webkit" | "safari" => Ok(BrowserEngine::Webkit),
            other => Err(PipelineError::Config(format!(
                "unknown browser engine '{}'",
                other
            ))),
        }
    }
}

/// Default viewport used to scale layout-shift rectangles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

/// File names inside a run directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactNames {
    pub archive: String,
    pub metrics: String,
    pub resource_timings: String,
    pub console: String,
    pub filmstrip_dir: String,
    pub screenshot: String,
    /// Recording extensions in priority order
    pub video_extensions: Vec<String>,
    pub model_output: String,
    pub metrics_output: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            archive: "network.har".to_string(),
            metrics: "metrics.json".to_string(),
            resource_timings: "resource-timings.json".to_string(),
            console: "console.json".to_string(),
            filmstrip_dir: "filmstrip".to_string(),
            screenshot: "screenshot.png".to_string(),
            video_extensions: vec!["webm".to_string(), "mp4".to_string()],
            model_output: "report-model.json".to_string(),
            metrics_output: "pipeline-metrics.prom".to_string(),
        }
    }
}

/// Configuration for processing a single run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub engine: BrowserEngine,
    pub viewport: Viewport,
    pub artifacts: ArtifactNames,
    pub interception: InterceptionPlan,
    /// Total blocking time measured by an external long-task tracker (ms)
    pub total_blocking_time_ms: Option<f64>,
}

impl RunConfig {
    pub fn with_engine(mut self, engine: BrowserEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Viewport { width, height };
        self
    }

    /// Check values that would otherwise surface as silent misbehaviour
    pub fn validate(&self) -> Result<()> {
        let Viewport { width, height } = self.viewport;
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(PipelineError::Config(format!(
                "viewport must be positive, got {}x{}",
                width, height
            )));
        }

        if let Some(tbt) = self.total_blocking_time_ms {
            if !tbt.is_finite() || tbt < 0.0 {
                return Err(PipelineError::Config(format!(
                    "total_blocking_time_ms must be a non-negative number, got {}",
                    tbt
                )));
            }
        }

        if self.artifacts.model_output.is_empty() {
            return Err(PipelineError::Config(
                "artifacts.model_output must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
