//! Telemetry collection from a finished run
//!
//! The in-page metrics collector and the network capture run inside the
//! browser automation layer. What reaches this crate is a directory of JSON
//! blobs and media files; this module reads them back into typed inputs.

mod artifacts;
mod directory;

#[cfg(test)]
mod tests;

pub use artifacts::{list_artifacts, ArtifactListing, FilmstripFrame};
pub use directory::DirectoryTelemetrySource;

use crate::archive::Archive;
use crate::error::{PipelineError, Result};
use crate::models::{ConsoleMessage, MetricsBlob, RawTimingSample};
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::Path;

/// Everything captured for one run, as typed inputs
#[derive(Debug, Clone, Default)]
pub struct RunInputs {
    pub archive: Option<Archive>,
    pub timing_samples: Vec<RawTimingSample>,
    pub metrics: Option<MetricsBlob>,
    pub console: Option<Vec<ConsoleMessage>>,
    pub artifacts: ArtifactListing,
}

/// Source of the telemetry captured for a run
///
/// Implementations degrade missing or malformed inputs to absence; none of
/// these calls fail.
pub trait TelemetrySource {
    /// Network archive, `None` when there is no network data
    fn archive(&self) -> Option<Archive>;

    /// Live per-request timing samples
    fn timing_samples(&self) -> Vec<RawTimingSample>;

    /// Navigation, paint, LCP and layout-shift entries
    fn metrics(&self) -> Option<MetricsBlob>;

    /// Console messages
    fn console(&self) -> Option<Vec<ConsoleMessage>>;

    /// Filmstrip frames, screenshot and recording on disk
    fn artifacts(&self) -> ArtifactListing;

    /// Gather every input
    fn collect(&self) -> RunInputs {
        RunInputs {
            archive: self.archive(),
            timing_samples: self.timing_samples(),
            metrics: self.metrics(),
            console: self.console(),
            artifacts: self.artifacts(),
        }
    }
}

/// Read and deserialize a JSON file
///
/// An absent file is `Ok(None)`; unreadable or malformed content is an error.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PipelineError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| PipelineError::Json {
            path: path.to_path_buf(),
            source,
        })
}
