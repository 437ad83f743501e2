//! On-disk media artifacts of a run
//!
//! - `filmstrip/`: frames whose file stem carries the capture time in ms
//! - a final screenshot
//! - a single recording; the first configured extension with a match wins

use crate::config::ArtifactNames;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

const FRAME_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// One filmstrip frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmstripFrame {
    /// Capture time relative to navigation start (ms)
    pub timestamp_ms: u64,
    /// Path relative to the run directory
    pub path: String,
}

/// Media files found in a run directory, paths relative to it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactListing {
    pub filmstrip: Vec<FilmstripFrame>,
    pub screenshot: Option<String>,
    pub video: Option<String>,
}

impl ArtifactListing {
    pub fn is_empty(&self) -> bool {
        self.filmstrip.is_empty() && self.screenshot.is_none() && self.video.is_none()
    }
}

/// List the media artifacts of a run directory
pub fn list_artifacts(run_dir: &Path, names: &ArtifactNames) -> ArtifactListing {
    let screenshot = run_dir
        .join(&names.screenshot)
        .is_file()
        .then(|| names.screenshot.clone());

    ArtifactListing {
        filmstrip: list_filmstrip(run_dir, &names.filmstrip_dir),
        screenshot,
        video: find_video(run_dir, &names.video_extensions),
    }
}

/// Frames sorted by capture time; files without a timestamp are skipped
fn list_filmstrip(run_dir: &Path, dir_name: &str) -> Vec<FilmstripFrame> {
    let Ok(entries) = fs::read_dir(run_dir.join(dir_name)) else {
        return Vec::new();
    };

    let mut frames: Vec<FilmstripFrame> = entries
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let path = entry.path();
            let ext = path.extension()?.to_str()?.to_ascii_lowercase();
            if !FRAME_EXTENSIONS.contains(&ext.as_str()) {
                return None;
            }
            let stem = path.file_stem()?.to_str()?;
            let Some(timestamp_ms) = frame_timestamp(stem) else {
                debug!(file = %path.display(), "Skipping filmstrip file without timestamp");
                return None;
            };
            let file_name = entry.file_name().to_string_lossy().to_string();
            Some(FilmstripFrame {
                timestamp_ms,
                path: format!("{}/{}", dir_name, file_name),
            })
        })
        .collect();

    frames.sort_by(|a, b| {
        a.timestamp_ms
            .cmp(&b.timestamp_ms)
            .then_with(|| a.path.cmp(&b.path))
    });
    frames
}

/// Last run of digits in a frame file stem (`frame-000120` → 120)
pub(crate) fn frame_timestamp(stem: &str) -> Option<u64> {
    let head = stem.trim_end_matches(|c: char| !c.is_ascii_digit());
    let digits = &head[head.trim_end_matches(|c: char| c.is_ascii_digit()).len()..];
    digits.parse().ok()
}

/// First recording by extension priority, then by file name
fn find_video(run_dir: &Path, extensions: &[String]) -> Option<String> {
    let entries = fs::read_dir(run_dir).ok()?;
    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();

    extensions.iter().find_map(|ext| {
        names
            .iter()
            .find(|name| {
                Path::new(name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.eq_ignore_ascii_case(ext))
                    .unwrap_or(false)
            })
            .cloned()
    })
}
