//! Network waterfall rows and summary

use super::format::{filename_label, format_bytes};
use crate::models::{EnrichedRequestRecord, ResourceType};
use crate::phases::{PhaseCalculator, RequestTimings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One request bar, positioned in percent of the observed span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallRow {
    pub url: String,
    pub label: String,
    pub method: String,
    pub status: u16,
    pub resource_type: ResourceType,
    pub size_bytes: u64,
    pub size_label: String,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub offset_pct: f64,
    pub width_pct: f64,
    pub timings: RequestTimings,
    pub is_lcp: bool,
}

/// Request count and bytes for one resource type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceBreakdown {
    pub resource_type: ResourceType,
    pub count: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterfallSummary {
    pub request_count: usize,
    pub total_bytes: u64,
    pub total_bytes_label: String,
    pub span_ms: f64,
    pub by_type: Vec<ResourceBreakdown>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Waterfall {
    pub rows: Vec<WaterfallRow>,
    pub summary: WaterfallSummary,
}

impl Waterfall {
    /// Lay records out over `max(start + duration) - min(start)`
    ///
    /// A zero span leaves every offset and width at 0.
    pub fn build(records: &[EnrichedRequestRecord]) -> Self {
        let calc = PhaseCalculator::per_field();

        let earliest = records
            .iter()
            .map(|r| r.start_offset_ms)
            .fold(f64::INFINITY, f64::min);
        let latest = records
            .iter()
            .map(|r| r.start_offset_ms + r.effective_duration())
            .fold(f64::NEG_INFINITY, f64::max);
        let span_ms = if records.is_empty() {
            0.0
        } else {
            (latest - earliest).max(0.0)
        };

        let rows = records
            .iter()
            .map(|r| {
                let duration_ms = r.effective_duration();
                WaterfallRow {
                    url: r.url.clone(),
                    label: filename_label(&r.url),
                    method: r.method.clone(),
                    status: r.status,
                    resource_type: r.resource_type,
                    size_bytes: r.size_bytes,
                    size_label: format_bytes(r.size_bytes),
                    start_ms: r.start_offset_ms,
                    duration_ms,
                    offset_pct: calc.percentage(r.start_offset_ms - earliest, span_ms),
                    width_pct: calc.percentage(duration_ms, span_ms),
                    timings: r.timings,
                    is_lcp: r.is_lcp,
                }
            })
            .collect();

        Self {
            rows,
            summary: summarize(records, span_ms),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn lcp_row(&self) -> Option<&WaterfallRow> {
        self.rows.iter().find(|r| r.is_lcp)
    }
}

fn summarize(records: &[EnrichedRequestRecord], span_ms: f64) -> WaterfallSummary {
    let mut by_type: BTreeMap<ResourceType, (usize, u64)> = BTreeMap::new();
    for record in records {
        let slot = by_type.entry(record.resource_type).or_default();
        slot.0 += 1;
        slot.1 += record.size_bytes;
    }

    let total_bytes: u64 = records.iter().map(|r| r.size_bytes).sum();

    WaterfallSummary {
        request_count: records.len(),
        total_bytes,
        total_bytes_label: format_bytes(total_bytes),
        span_ms,
        by_type: by_type
            .into_iter()
            .map(|(resource_type, (count, bytes))| ResourceBreakdown {
                resource_type,
                count,
                bytes,
            })
            .collect(),
    }
}
