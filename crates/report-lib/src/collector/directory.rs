//! Telemetry source backed by a run directory

use super::{list_artifacts, read_json, ArtifactListing, TelemetrySource};
use crate::archive::{Archive, NetworkArchiveParser};
use crate::config::ArtifactNames;
use crate::models::{ConsoleMessage, MetricsBlob, RawTimingSample};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads a run's artifacts from the directory the capture wrote them to
pub struct DirectoryTelemetrySource {
    run_dir: PathBuf,
    names: ArtifactNames,
}

impl DirectoryTelemetrySource {
    pub fn new(run_dir: impl Into<PathBuf>, names: ArtifactNames) -> Self {
        Self {
            run_dir: run_dir.into(),
            names,
        }
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Read an optional JSON blob, logging and dropping malformed content
    fn read_optional<T: DeserializeOwned>(&self, file_name: &str, what: &str) -> Option<T> {
        let path = self.run_dir.join(file_name);
        match read_json::<T>(&path) {
            Ok(Some(value)) => Some(value),
            Ok(None) => {
                debug!(path = %path.display(), "No {} captured", what);
                None
            }
            Err(e) => {
                warn!(error = %e, "Ignoring malformed {}", what);
                None
            }
        }
    }
}

impl TelemetrySource for DirectoryTelemetrySource {
    fn archive(&self) -> Option<Archive> {
        NetworkArchiveParser::load(&self.run_dir.join(&self.names.archive))
    }

    fn timing_samples(&self) -> Vec<RawTimingSample> {
        self.read_optional(&self.names.resource_timings, "resource timings")
            .unwrap_or_default()
    }

    fn metrics(&self) -> Option<MetricsBlob> {
        self.read_optional(&self.names.metrics, "metrics blob")
    }

    fn console(&self) -> Option<Vec<ConsoleMessage>> {
        self.read_optional(&self.names.console, "console log")
    }

    fn artifacts(&self) -> ArtifactListing {
        list_artifacts(&self.run_dir, &self.names)
    }
}
