//! Report renderers
//!
//! Rendering the presentational document is up to a [`ReportRenderer`]
//! collaborator. The built-in renderer writes the model itself as JSON, which
//! is what the inspection CLI and external templates read.

use crate::error::{PipelineError, Result};
use crate::report::ReportModel;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes a report artifact for a model
pub trait ReportRenderer: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Write into `out_dir`, returning the path written
    fn render(&self, model: &ReportModel, out_dir: &Path) -> Result<PathBuf>;
}

/// Writes the model as pretty-printed JSON
pub struct JsonModelRenderer {
    file_name: String,
}

impl JsonModelRenderer {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl ReportRenderer for JsonModelRenderer {
    fn name(&self) -> &str {
        "json-model"
    }

    fn render(&self, model: &ReportModel, out_dir: &Path) -> Result<PathBuf> {
        let json = serde_json::to_vec_pretty(model).map_err(|e| PipelineError::Encode {
            what: "report model",
            reason: e.to_string(),
        })?;

        let path = out_dir.join(&self.file_name);
        write_artifact(&path, &json)?;
        Ok(path)
    }
}

/// Write an output file, reporting failures as [`PipelineError::Write`]
pub fn write_artifact(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}
