//! Page-load report pipeline
//!
//! This crate turns the artifacts of a captured page load into a report model:
//! - Network archive parsing and live timing merge
//! - Request and page-level timing phases
//! - Web vitals, waterfall, layout-shift overlays and console summary
//! - Interception policies for the capture layer
//! - Per-run metrics and structured logging

pub mod archive;
pub mod collector;
pub mod config;
pub mod error;
pub mod intercept;
pub mod merge;
pub mod models;
pub mod observability;
pub mod phases;
pub mod pipeline;
pub mod render;
pub mod report;

pub use collector::{DirectoryTelemetrySource, RunInputs, TelemetrySource};
pub use config::{BrowserEngine, RunConfig, Viewport};
pub use error::{PipelineError, Result};
pub use merge::{MergeOutcome, TelemetryMerger};
pub use models::*;
pub use observability::{PipelineMetrics, StructuredLogger};
pub use pipeline::{ReportPipeline, RunOutcome};
pub use render::{JsonModelRenderer, ReportRenderer};
pub use report::{ReportDataBuilder, ReportModel, ReportSources};
