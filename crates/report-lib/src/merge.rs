//! Merging live timing samples into archive entries
//!
//! The archive and the in-page instrumentation capture the same requests
//! independently. Samples are matched to entries by exact URL; each sample
//! goes to the first entry with that URL that has not already absorbed one,
//! so N requests to the same URL take N samples in capture order.

use crate::archive::{Archive, ArchiveEntry, NetworkArchiveParser};
use crate::models::{EnrichedRequestRecord, RawTimingSample};
use crate::phases::{RequestBoundaries, NOT_APPLICABLE};
use tracing::debug;

/// Result of merging a run's network data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Records in archive order
    pub records: Vec<EnrichedRequestRecord>,
    /// Samples that found an entry
    pub merged_samples: usize,
    /// Samples with no remaining entry for their URL
    pub unmatched_samples: usize,
    /// Index of the record flagged as the LCP resource
    pub lcp_index: Option<usize>,
}

/// Reconciles archive entries with live timing samples
pub struct TelemetryMerger;

impl TelemetryMerger {
    /// Merge samples into the archive and build the final records
    ///
    /// `lcp_url` is the resource URL of the winning LCP event; the first
    /// record with exactly that URL is flagged.
    pub fn merge(
        archive: Archive,
        samples: &[RawTimingSample],
        lcp_url: Option<&str>,
    ) -> MergeOutcome {
        let mut entries = archive.entries;
        let merged_samples = Self::inject(&mut entries, samples);
        let unmatched_samples = samples.len() - merged_samples;

        let mut records = NetworkArchiveParser::records(&entries);

        let lcp_index = lcp_url
            .filter(|url| !url.is_empty())
            .and_then(|url| records.iter().position(|r| r.url == url));
        if let Some(i) = lcp_index {
            records[i].is_lcp = true;
        }

        debug!(
            entries = records.len(),
            merged_samples,
            unmatched_samples,
            lcp_flagged = lcp_index.is_some(),
            "Merged live timing samples into archive"
        );

        MergeOutcome {
            records,
            merged_samples,
            unmatched_samples,
            lcp_index,
        }
    }

    /// Inject samples into entries, first-wins per URL
    ///
    /// Returns the number of samples that found an entry.
    pub fn inject(entries: &mut [ArchiveEntry], samples: &[RawTimingSample]) -> usize {
        let mut merged = 0;

        for sample in samples {
            let target = entries
                .iter_mut()
                .find(|entry| !entry.enriched && entry.url == sample.url);

            match target {
                Some(entry) => {
                    Self::apply_sample(entry, sample);
                    merged += 1;
                }
                None => {
                    debug!(url = %sample.url, "No archive entry left for timing sample");
                }
            }
        }

        merged
    }

    /// Copy a sample's boundaries into an entry and mark it enriched
    ///
    /// A TLS handshake is carved out of the connect phase: connect ends where
    /// the secure connection starts. Without a handshake both secure
    /// boundaries hold the not-applicable sentinel.
    pub fn apply_sample(entry: &mut ArchiveEntry, sample: &RawTimingSample) {
        let current = entry.boundaries;
        let secure = sample.secure_connection_start.filter(|s| *s > 0.0);
        let connect_end = sample.connect_end.or(current.connect_end);

        let (connect_end, secure_start, secure_end) = match secure {
            Some(secure_start) => (Some(secure_start), Some(secure_start), connect_end),
            None => (connect_end, Some(NOT_APPLICABLE), Some(NOT_APPLICABLE)),
        };

        entry.boundaries = RequestBoundaries {
            dns_start: sample.dns_start.or(current.dns_start),
            dns_end: sample.dns_end.or(current.dns_end),
            connect_start: sample.connect_start.or(current.connect_start),
            connect_end,
            secure_start,
            secure_end,
            request_start: sample.request_start.or(current.request_start),
            response_start: sample.response_start.or(current.response_start),
            response_end: sample.response_end.or(current.response_end),
        };
        entry.enriched = true;
    }
}
