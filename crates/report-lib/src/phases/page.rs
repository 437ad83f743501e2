//! Page-level navigation phases

use super::PhaseCalculator;
use crate::models::NavigationTiming;
use serde::{Deserialize, Serialize};

/// Named phases of a page load, in chain order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePhase {
    Dns,
    Tcp,
    Ssl,
    Request,
    Response,
    DomProcessing,
    DomContentLoaded,
    CompleteLoad,
}

impl PagePhase {
    pub const ALL: [PagePhase; 8] = [
        PagePhase::Dns,
        PagePhase::Tcp,
        PagePhase::Ssl,
        PagePhase::Request,
        PagePhase::Response,
        PagePhase::DomProcessing,
        PagePhase::DomContentLoaded,
        PagePhase::CompleteLoad,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            PagePhase::Dns => "DNS Lookup",
            PagePhase::Tcp => "TCP Connect",
            PagePhase::Ssl => "SSL/TLS",
            PagePhase::Request => "Request (TTFB)",
            PagePhase::Response => "Response",
            PagePhase::DomProcessing => "DOM Processing",
            PagePhase::DomContentLoaded => "DOM Content Loaded",
            PagePhase::CompleteLoad => "Complete Load",
        }
    }

    /// Connection phases are skipped entirely on reused or cached connections
    pub fn is_optional(&self) -> bool {
        matches!(self, PagePhase::Dns | PagePhase::Tcp | PagePhase::Ssl)
    }
}

/// One phase of the page load
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseValue {
    /// Offset of the phase start from navigation start (ms)
    pub start_ms: f64,
    pub duration_ms: f64,
    /// Share of the total load time
    pub percent: f64,
}

/// Page-level timing phases derived from a navigation timing record
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingPhases {
    pub dns: PhaseValue,
    pub tcp: PhaseValue,
    pub ssl: PhaseValue,
    pub request: PhaseValue,
    pub response: PhaseValue,
    pub dom_processing: PhaseValue,
    pub dom_content_loaded: PhaseValue,
    pub complete_load: PhaseValue,
    /// Navigation start to load event end (ms)
    pub total_ms: f64,
}

impl TimingPhases {
    /// Derive phases from a navigation timing record
    ///
    /// Missing fields count as 0 individually. TLS is carved out of the TCP
    /// phase when a secure connection start is reported.
    pub fn from_navigation(nav: &NavigationTiming) -> Self {
        let calc = PhaseCalculator::per_field();
        let origin = nav.start_time.filter(|v| v.is_finite()).unwrap_or(0.0);

        let secure_start = nav.secure_connection_start.filter(|v| *v > 0.0);
        let tcp_end = secure_start.or(nav.connect_end);

        let total_ms = calc.span(nav.start_time, nav.load_event_end);

        let phase = |start: Option<f64>, end: Option<f64>, optional: bool| {
            let duration_ms = calc.span(start, end);
            let percent = if optional {
                calc.optional_percentage(duration_ms, total_ms)
            } else {
                calc.percentage(duration_ms, total_ms)
            };
            PhaseValue {
                start_ms: start.filter(|v| v.is_finite()).unwrap_or(0.0) - origin,
                duration_ms,
                percent,
            }
        };

        let ssl = match secure_start {
            Some(start) => phase(Some(start), nav.connect_end, true),
            None => PhaseValue::default(),
        };

        Self {
            dns: phase(nav.domain_lookup_start, nav.domain_lookup_end, true),
            tcp: phase(nav.connect_start, tcp_end, true),
            ssl,
            request: phase(nav.request_start, nav.response_start, false),
            response: phase(nav.response_start, nav.response_end, false),
            dom_processing: phase(nav.response_end, nav.dom_interactive, false),
            dom_content_loaded: phase(
                nav.dom_interactive,
                nav.dom_content_loaded_event_end,
                false,
            ),
            complete_load: phase(
                nav.dom_content_loaded_event_end,
                nav.load_event_end,
                false,
            ),
            total_ms,
        }
    }

    pub fn get(&self, phase: PagePhase) -> PhaseValue {
        match phase {
            PagePhase::Dns => self.dns,
            PagePhase::Tcp => self.tcp,
            PagePhase::Ssl => self.ssl,
            PagePhase::Request => self.request,
            PagePhase::Response => self.response,
            PagePhase::DomProcessing => self.dom_processing,
            PagePhase::DomContentLoaded => self.dom_content_loaded,
            PagePhase::CompleteLoad => self.complete_load,
        }
    }

    /// Phases in chain order
    pub fn iter(&self) -> impl Iterator<Item = (PagePhase, PhaseValue)> + '_ {
        PagePhase::ALL.iter().map(move |p| (*p, self.get(*p)))
    }

    /// Sum of all phase percentages
    pub fn percent_sum(&self) -> f64 {
        self.iter().map(|(_, v)| v.percent).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tls_navigation() -> NavigationTiming {
        NavigationTiming {
            start_time: Some(0.0),
            domain_lookup_start: Some(5.0),
            domain_lookup_end: Some(25.0),
            connect_start: Some(25.0),
            secure_connection_start: Some(45.0),
            connect_end: Some(75.0),
            request_start: Some(75.0),
            response_start: Some(175.0),
            response_end: Some(200.0),
            dom_interactive: Some(600.0),
            dom_content_loaded_event_start: Some(600.0),
            dom_content_loaded_event_end: Some(650.0),
            load_event_start: Some(950.0),
            load_event_end: Some(1000.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_phases_from_tls_navigation() {
        let phases = TimingPhases::from_navigation(&tls_navigation());

        assert_eq!(phases.total_ms, 1000.0);
        assert_eq!(phases.dns.duration_ms, 20.0);
        assert_eq!(phases.tcp.duration_ms, 20.0);
        assert_eq!(phases.ssl.duration_ms, 30.0);
        assert_eq!(phases.request.duration_ms, 100.0);
        assert_eq!(phases.response.duration_ms, 25.0);
        assert_eq!(phases.dom_processing.duration_ms, 400.0);
        assert_eq!(phases.dom_content_loaded.duration_ms, 50.0);
        assert_eq!(phases.complete_load.duration_ms, 350.0);

        assert_eq!(phases.request.percent, 10.0);
        assert_eq!(phases.ssl.start_ms, 45.0);
    }

    #[test]
    fn test_percentages_bounded_by_total() {
        let phases = TimingPhases::from_navigation(&tls_navigation());
        assert!(phases.percent_sum() <= 100.0 + 1e-9);
    }

    #[test]
    fn test_plain_http_has_no_ssl_phase() {
        let nav = NavigationTiming {
            secure_connection_start: Some(0.0),
            ..tls_navigation()
        };
        let phases = TimingPhases::from_navigation(&nav);

        assert_eq!(phases.ssl, PhaseValue::default());
        assert_eq!(phases.tcp.duration_ms, 50.0);
    }

    #[test]
    fn test_zero_total_zeroes_every_percentage() {
        let nav = NavigationTiming {
            load_event_end: None,
            ..tls_navigation()
        };
        let phases = TimingPhases::from_navigation(&nav);

        assert_eq!(phases.total_ms, 0.0);
        for (_, value) in phases.iter() {
            assert_eq!(value.percent, 0.0);
        }
    }

    #[test]
    fn test_cached_connection_suppresses_connection_percentages() {
        let nav = NavigationTiming {
            domain_lookup_start: Some(5.0),
            domain_lookup_end: Some(5.0),
            connect_start: Some(5.0),
            connect_end: Some(5.0),
            secure_connection_start: None,
            ..tls_navigation()
        };
        let phases = TimingPhases::from_navigation(&nav);

        assert_eq!(phases.dns.percent, 0.0);
        assert_eq!(phases.tcp.percent, 0.0);
        assert_eq!(phases.ssl.percent, 0.0);
        assert!(phases.request.percent > 0.0);
    }
}
