//! Core web vitals and their ratings

use crate::config::BrowserEngine;
use crate::models::{LayoutShiftEntry, LcpEntry, MetricsBlob, PaintEntry};
use serde::{Deserialize, Serialize};

/// Three-tier vital rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    #[serde(rename = "Poor")]
    Poor,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Good => "Good",
            Rating::NeedsImprovement => "Needs Improvement",
            Rating::Poor => "Poor",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper bounds (inclusive) of the Good and Needs Improvement tiers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub good: f64,
    pub needs_improvement: f64,
}

impl Thresholds {
    pub const fn new(good: f64, needs_improvement: f64) -> Self {
        Self {
            good,
            needs_improvement,
        }
    }

    pub fn rate(&self, value: f64) -> Rating {
        if value <= self.good {
            Rating::Good
        } else if value <= self.needs_improvement {
            Rating::NeedsImprovement
        } else {
            Rating::Poor
        }
    }
}

/// The vitals carried by a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VitalKind {
    Ttfb,
    Fp,
    Fcp,
    Lcp,
    Cls,
    Tbt,
}

impl VitalKind {
    pub const ALL: [VitalKind; 6] = [
        VitalKind::Ttfb,
        VitalKind::Fp,
        VitalKind::Fcp,
        VitalKind::Lcp,
        VitalKind::Cls,
        VitalKind::Tbt,
    ];

    pub fn thresholds(&self) -> Thresholds {
        match self {
            VitalKind::Ttfb => Thresholds::new(800.0, 1800.0),
            VitalKind::Fp | VitalKind::Fcp => Thresholds::new(1800.0, 3000.0),
            VitalKind::Lcp => Thresholds::new(2500.0, 4000.0),
            VitalKind::Cls => Thresholds::new(0.1, 0.25),
            VitalKind::Tbt => Thresholds::new(200.0, 600.0),
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            VitalKind::Ttfb => "TTFB",
            VitalKind::Fp => "FP",
            VitalKind::Fcp => "FCP",
            VitalKind::Lcp => "LCP",
            VitalKind::Cls => "CLS",
            VitalKind::Tbt => "TBT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VitalKind::Ttfb => "Time to First Byte",
            VitalKind::Fp => "First Paint",
            VitalKind::Fcp => "First Contentful Paint",
            VitalKind::Lcp => "Largest Contentful Paint",
            VitalKind::Cls => "Cumulative Layout Shift",
            VitalKind::Tbt => "Total Blocking Time",
        }
    }

    /// CLS is unitless, everything else is in milliseconds
    pub fn is_unitless(&self) -> bool {
        matches!(self, VitalKind::Cls)
    }
}

/// A measured vital; both fields are `None` when nothing was measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WebVital {
    pub value: Option<f64>,
    pub rating: Option<Rating>,
}

impl WebVital {
    pub fn measure(kind: VitalKind, value: Option<f64>) -> Self {
        let value = value.filter(|v| v.is_finite());
        Self {
            value,
            rating: value.map(|v| kind.thresholds().rate(v)),
        }
    }

    pub fn is_measured(&self) -> bool {
        self.value.is_some()
    }
}

/// Core web vitals of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WebVitals {
    pub ttfb: WebVital,
    pub fp: WebVital,
    pub fcp: WebVital,
    pub lcp: WebVital,
    pub cls: WebVital,
    pub tbt: WebVital,
}

impl WebVitals {
    /// Compute vitals from the in-page metrics
    ///
    /// TBT is 0 unless a measurement is supplied. CLS is only reported as a
    /// measured 0 for engines that emit layout-shift entries.
    pub fn compute(
        metrics: Option<&MetricsBlob>,
        engine: BrowserEngine,
        total_blocking_time_ms: Option<f64>,
    ) -> Self {
        let tbt = WebVital::measure(VitalKind::Tbt, Some(total_blocking_time_ms.unwrap_or(0.0)));

        let Some(metrics) = metrics else {
            return Self {
                tbt,
                ..Default::default()
            };
        };

        let ttfb = metrics.navigation.as_ref().and_then(|nav| {
            nav.response_start
                .map(|rs| (rs - nav.start_time.unwrap_or(0.0)).max(0.0))
        });

        let cls = if engine.reports_layout_shifts() || !metrics.layout_shifts.is_empty() {
            Some(cumulative_layout_shift(&metrics.layout_shifts))
        } else {
            None
        };

        Self {
            ttfb: WebVital::measure(VitalKind::Ttfb, ttfb),
            fp: WebVital::measure(VitalKind::Fp, paint_time(&metrics.paint, "first-paint")),
            fcp: WebVital::measure(
                VitalKind::Fcp,
                paint_time(&metrics.paint, "first-contentful-paint"),
            ),
            lcp: WebVital::measure(VitalKind::Lcp, winning_lcp(&metrics.lcp).map(|e| e.start_time)),
            cls: WebVital::measure(VitalKind::Cls, cls),
            tbt,
        }
    }

    pub fn get(&self, kind: VitalKind) -> WebVital {
        match kind {
            VitalKind::Ttfb => self.ttfb,
            VitalKind::Fp => self.fp,
            VitalKind::Fcp => self.fcp,
            VitalKind::Lcp => self.lcp,
            VitalKind::Cls => self.cls,
            VitalKind::Tbt => self.tbt,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (VitalKind, WebVital)> + '_ {
        VitalKind::ALL.iter().map(move |k| (*k, self.get(*k)))
    }
}

/// Sum of every layout-shift value, without session windowing
pub fn cumulative_layout_shift(shifts: &[LayoutShiftEntry]) -> f64 {
    shifts
        .iter()
        .map(|s| s.value)
        .filter(|v| v.is_finite())
        .sum()
}

/// The LCP candidate that won: browsers report larger candidates later
pub fn winning_lcp(entries: &[LcpEntry]) -> Option<&LcpEntry> {
    entries.last()
}

fn paint_time(paint: &[PaintEntry], name: &str) -> Option<f64> {
    paint.iter().find(|p| p.name == name).map(|p| p.start_time)
}
