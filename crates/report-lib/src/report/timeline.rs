//! Page-load timeline bar and its legend

use crate::phases::{PagePhase, PhaseCalculator, TimingPhases};
use serde::{Deserialize, Serialize};

/// One bar segment, positioned in percent of the total load time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSegment {
    pub phase: PagePhase,
    pub label: String,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub offset_pct: f64,
    pub width_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub phase: PagePhase,
    pub label: String,
    pub duration_ms: f64,
    pub percent: f64,
}

/// Segments for every phase that took time, in chain order
pub fn build_timeline(phases: &TimingPhases) -> Vec<TimelineSegment> {
    let calc = PhaseCalculator::per_field();

    phases
        .iter()
        .filter(|(_, value)| value.duration_ms > 0.0)
        .map(|(phase, value)| TimelineSegment {
            phase,
            label: phase.label().to_string(),
            start_ms: value.start_ms,
            duration_ms: value.duration_ms,
            offset_pct: calc
                .percentage(value.start_ms, phases.total_ms)
                .clamp(0.0, 100.0),
            width_pct: value.percent.clamp(0.0, 100.0),
        })
        .collect()
}

/// Legend rows; connection phases that did not happen are left out
pub fn build_legend(phases: &TimingPhases) -> Vec<LegendEntry> {
    phases
        .iter()
        .filter(|(phase, value)| !phase.is_optional() || value.duration_ms > 0.0)
        .map(|(phase, value)| LegendEntry {
            phase,
            label: phase.label().to_string(),
            duration_ms: value.duration_ms,
            percent: value.percent,
        })
        .collect()
}
