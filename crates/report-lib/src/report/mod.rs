//! Report model assembly
//!
//! [`ReportDataBuilder`] turns the merged network records and the in-page
//! metrics of one run into a [`ReportModel`]: vitals with ratings, the page
//! timeline, waterfall rows, layout-shift overlays, media references and
//! console entries. The model is built once and never changed afterwards.

mod console;
mod format;
mod layout_shift;
mod timeline;
mod vitals;
mod waterfall;

pub use console::{build_console, ConsoleEntry, ConsoleLevel, ConsoleSummary};
pub use format::{filename_label, format_bytes, format_ms, format_number, MAX_LABEL_CHARS};
pub use layout_shift::{
    build_layout_shifts, viewport_bounds, LayoutShiftVisual, ScaledRect, ShiftSourceVisual,
};
pub use timeline::{build_legend, build_timeline, LegendEntry, TimelineSegment};
pub use vitals::{
    cumulative_layout_shift, winning_lcp, Rating, Thresholds, VitalKind, WebVital, WebVitals,
};
pub use waterfall::{ResourceBreakdown, Waterfall, WaterfallRow, WaterfallSummary};

use crate::collector::ArtifactListing;
use crate::config::{BrowserEngine, RunConfig, Viewport};
use crate::intercept::InterceptionPlan;
use crate::models::{ConsoleMessage, EnrichedRequestRecord, MetricsBlob};
use crate::phases::TimingPhases;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Element and resource behind the winning LCP candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LcpAttribution {
    pub start_time_ms: f64,
    pub element: Option<String>,
    pub url: Option<String>,
    pub size: Option<f64>,
    /// Whether a waterfall row was flagged for the resource
    pub matched_request: bool,
}

/// Everything a renderer needs for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportModel {
    pub url: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub engine: BrowserEngine,
    pub viewport: Viewport,
    pub has_network_data: bool,
    pub vitals: WebVitals,
    pub lcp: Option<LcpAttribution>,
    pub page_timings: Option<TimingPhases>,
    pub legend: Vec<LegendEntry>,
    pub timeline: Vec<TimelineSegment>,
    pub waterfall: Waterfall,
    pub layout_shifts: Vec<LayoutShiftVisual>,
    pub artifacts: ArtifactListing,
    pub console: Vec<ConsoleEntry>,
    pub console_summary: ConsoleSummary,
    pub interception: InterceptionPlan,
}

/// Borrowed inputs of one report
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportSources<'a> {
    /// Merged records, `None` when the run has no network data
    pub records: Option<&'a [EnrichedRequestRecord]>,
    pub metrics: Option<&'a MetricsBlob>,
    pub console: &'a [ConsoleMessage],
    pub artifacts: Option<&'a ArtifactListing>,
}

/// Builds report models under a run configuration
pub struct ReportDataBuilder<'a> {
    config: &'a RunConfig,
}

impl<'a> ReportDataBuilder<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, sources: ReportSources<'_>) -> ReportModel {
        self.build_at(sources, Utc::now())
    }

    /// Build with an explicit generation timestamp
    pub fn build_at(&self, sources: ReportSources<'_>, generated_at: DateTime<Utc>) -> ReportModel {
        let records = sources.records.unwrap_or_default();
        let metrics = sources.metrics;

        let vitals = WebVitals::compute(
            metrics,
            self.config.engine,
            self.config.total_blocking_time_ms,
        );

        let page_timings = metrics
            .and_then(|m| m.navigation.as_ref())
            .map(TimingPhases::from_navigation);
        let (legend, timeline) = match &page_timings {
            Some(phases) => (build_legend(phases), build_timeline(phases)),
            None => (Vec::new(), Vec::new()),
        };

        let waterfall = Waterfall::build(records);

        let lcp = metrics
            .and_then(|m| winning_lcp(&m.lcp))
            .map(|entry| LcpAttribution {
                start_time_ms: entry.start_time,
                element: entry.element.clone(),
                url: entry.url.clone().filter(|u| !u.is_empty()),
                size: entry.size,
                matched_request: waterfall.lcp_row().is_some(),
            });

        let layout_shifts = metrics
            .map(|m| build_layout_shifts(&m.layout_shifts, self.config.viewport))
            .unwrap_or_default();

        let (console, console_summary) = build_console(sources.console);

        let url = records.first().map(|r| r.url.clone()).or_else(|| {
            metrics
                .and_then(|m| m.navigation.as_ref())
                .and_then(|n| n.name.clone())
        });

        ReportModel {
            url,
            generated_at,
            engine: self.config.engine,
            viewport: self.config.viewport,
            has_network_data: sources.records.is_some(),
            vitals,
            lcp,
            page_timings,
            legend,
            timeline,
            waterfall,
            layout_shifts,
            artifacts: sources.artifacts.cloned().unwrap_or_default(),
            console,
            console_summary,
            interception: self.config.interception.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LayoutShiftEntry, LcpEntry, NavigationTiming, ResourceType};
    use crate::phases::RequestTimings;

    fn record(url: &str, is_lcp: bool) -> EnrichedRequestRecord {
        EnrichedRequestRecord {
            url: url.to_string(),
            method: "GET".to_string(),
            status: 200,
            size_bytes: 100,
            mime_type: None,
            resource_type: ResourceType::Other,
            start_offset_ms: 0.0,
            duration_ms: Some(10.0),
            timings: RequestTimings::default(),
            enriched: false,
            is_lcp,
        }
    }

    #[test]
    fn test_build_without_network_data() {
        let config = RunConfig::default();
        let metrics = MetricsBlob {
            navigation: Some(NavigationTiming {
                name: Some("https://a.test/".to_string()),
                start_time: Some(0.0),
                response_start: Some(100.0),
                load_event_end: Some(500.0),
                ..Default::default()
            }),
            ..Default::default()
        };

        let model = ReportDataBuilder::new(&config).build(ReportSources {
            metrics: Some(&metrics),
            ..Default::default()
        });

        assert!(!model.has_network_data);
        assert!(model.waterfall.is_empty());
        assert_eq!(model.url.as_deref(), Some("https://a.test/"));
        assert_eq!(model.vitals.ttfb.value, Some(100.0));
        assert_eq!(model.page_timings.unwrap().total_ms, 500.0);
        assert!(!model.legend.is_empty());
    }

    #[test]
    fn test_lcp_attribution() {
        let config = RunConfig::default();
        let records = vec![record("https://a.test/", false), record("https://a.test/hero.jpg", true)];
        let metrics = MetricsBlob {
            lcp: vec![LcpEntry {
                start_time: 1800.0,
                url: Some("https://a.test/hero.jpg".to_string()),
                element: Some("IMG".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let model = ReportDataBuilder::new(&config).build(ReportSources {
            records: Some(&records),
            metrics: Some(&metrics),
            ..Default::default()
        });

        let lcp = model.lcp.unwrap();
        assert!(lcp.matched_request);
        assert_eq!(lcp.element.as_deref(), Some("IMG"));
        assert_eq!(model.waterfall.lcp_row().unwrap().label, "hero.jpg");
        assert_eq!(model.url.as_deref(), Some("https://a.test/"));
    }

    #[test]
    fn test_layout_shifts_use_configured_viewport() {
        let config = RunConfig::default().with_viewport(1000.0, 500.0);
        let metrics = MetricsBlob {
            layout_shifts: vec![LayoutShiftEntry {
                value: 0.3,
                sources: vec![crate::models::LayoutShiftSource {
                    current_rect: Some(crate::models::Rect {
                        width: 500.0,
                        height: 250.0,
                        ..Default::default()
                    }),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };

        let model = ReportDataBuilder::new(&config).build(ReportSources {
            metrics: Some(&metrics),
            ..Default::default()
        });

        let rect = model.layout_shifts[0].sources[0].current.unwrap();
        assert_eq!(rect.width_pct, 50.0);
        assert_eq!(rect.height_pct, 50.0);
        assert_eq!(model.vitals.cls.rating, Some(Rating::Poor));
    }

    #[test]
    fn test_model_round_trips_through_json() {
        let config = RunConfig::default();
        let model = ReportDataBuilder::new(&config).build(ReportSources::default());

        let json = serde_json::to_string(&model).unwrap();
        let back: ReportModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }
}
