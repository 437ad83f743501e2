//! Network archive (HAR) parsing
//!
//! Reads the page-capture archive and normalizes each entry into an
//! [`EnrichedRequestRecord`]. An absent archive or one without entries is the
//! recoverable "no network data" state, not an error.

pub mod har;

use crate::collector::read_json;
use crate::error::Result;
use crate::models::{EnrichedRequestRecord, ResourceType};
use crate::phases::{RequestBoundaries, RequestTimings};
use chrono::DateTime;
use std::path::Path;
use tracing::{debug, warn};

/// One archive entry in pipeline form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveEntry {
    pub url: String,
    pub method: String,
    pub status: i64,
    pub content_size: Option<f64>,
    pub transfer_size: Option<f64>,
    pub mime_type: Option<String>,
    /// Wall-clock start, milliseconds since the Unix epoch
    pub started_at_ms: Option<f64>,
    /// Total elapsed time reported by the archive (ms)
    pub time_ms: Option<f64>,
    pub boundaries: RequestBoundaries,
    /// Set once a live timing sample has been merged in
    pub enriched: bool,
}

impl ArchiveEntry {
    /// Bytes transferred, preferring the private transfer size over the
    /// content length. Unknown or negative sizes count as 0.
    pub fn size_bytes(&self) -> u64 {
        self.transfer_size
            .filter(|s| s.is_finite() && *s >= 0.0)
            .or(self.content_size.filter(|s| s.is_finite() && *s >= 0.0))
            .map(|s| s as u64)
            .unwrap_or(0)
    }

    pub fn resource_type(&self) -> ResourceType {
        ResourceType::from_mime(self.mime_type.as_deref())
    }
}

impl From<har::Entry> for ArchiveEntry {
    fn from(entry: har::Entry) -> Self {
        let started_at_ms = entry
            .started_date_time
            .as_deref()
            .and_then(parse_started_date_time);

        Self {
            url: entry.request.url,
            method: entry.request.method,
            status: entry.response.status,
            content_size: entry.response.content.size,
            transfer_size: entry.response.transfer_size,
            mime_type: entry.response.content.mime_type,
            started_at_ms,
            time_ms: entry.time,
            boundaries: RequestBoundaries {
                dns_start: entry.dns_start,
                dns_end: entry.dns_end,
                connect_start: entry.connect_start,
                connect_end: entry.connect_end,
                secure_start: entry.secure_start,
                secure_end: entry.secure_end,
                request_start: entry.request_start,
                response_start: entry.response_start,
                response_end: entry.response_end,
            },
            enriched: false,
        }
    }
}

/// Parse an RFC 3339 `startedDateTime` into epoch milliseconds
fn parse_started_date_time(value: &str) -> Option<f64> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Some(dt.timestamp_micros() as f64 / 1000.0),
        Err(e) => {
            debug!(value = %value, error = %e, "Unparsable startedDateTime");
            None
        }
    }
}

/// Parsed archive, entries in capture order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Archive {
    pub entries: Vec<ArchiveEntry>,
}

impl Archive {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<har::Har> for Archive {
    fn from(har: har::Har) -> Self {
        Self {
            entries: har.log.entries.into_iter().map(ArchiveEntry::from).collect(),
        }
    }
}

/// Reads archives and normalizes their entries
pub struct NetworkArchiveParser;

impl NetworkArchiveParser {
    /// Read an archive from disk
    ///
    /// Returns `Ok(None)` when the file is absent or holds no entries.
    pub fn read(path: &Path) -> Result<Option<Archive>> {
        let Some(har) = read_json::<har::Har>(path)? else {
            return Ok(None);
        };

        let archive = Archive::from(har);
        if archive.is_empty() {
            debug!(path = %path.display(), "Archive has no entries");
            return Ok(None);
        }

        Ok(Some(archive))
    }

    /// Read an archive, downgrading malformed files to absence
    pub fn load(path: &Path) -> Option<Archive> {
        match Self::read(path) {
            Ok(archive) => archive,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable network archive");
                None
            }
        }
    }

    /// Read an archive and normalize it without live timing samples
    pub fn parse(path: &Path) -> Option<Vec<EnrichedRequestRecord>> {
        Self::load(path).map(|archive| Self::records(&archive.entries))
    }

    /// Normalize entries into records
    ///
    /// The first entry with a start time defines t=0 for the run.
    pub fn records(entries: &[ArchiveEntry]) -> Vec<EnrichedRequestRecord> {
        let origin = entries.iter().find_map(|e| e.started_at_ms);
        entries.iter().map(|e| Self::record(e, origin)).collect()
    }

    /// Normalize a single entry against the run origin (epoch ms)
    pub fn record(entry: &ArchiveEntry, origin_ms: Option<f64>) -> EnrichedRequestRecord {
        let start_offset_ms = match (entry.started_at_ms, origin_ms) {
            (Some(start), Some(origin)) => start - origin,
            _ => 0.0,
        };

        EnrichedRequestRecord {
            url: entry.url.clone(),
            method: entry.method.clone(),
            status: u16::try_from(entry.status).unwrap_or(0),
            size_bytes: entry.size_bytes(),
            mime_type: entry.mime_type.clone(),
            resource_type: entry.resource_type(),
            start_offset_ms,
            duration_ms: entry.time_ms.filter(|t| t.is_finite() && *t >= 0.0),
            timings: RequestTimings::from_boundaries(&entry.boundaries),
            enriched: entry.enriched,
            is_lcp: false,
        }
    }
}
