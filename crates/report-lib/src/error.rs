//! Error types for the report pipeline
//!
//! Most input problems are recoverable and never surface as errors to the
//! caller of the pipeline: readers return `Ok(None)` for absent files and the
//! telemetry source downgrades malformed files to absence after logging. The
//! variants here are what the low-level readers and the final artifact writers
//! report.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while reading run artifacts or writing report outputs
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {what}: {reason}")]
    Encode { what: &'static str, reason: String },

    #[error("invalid URL pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
