//! Per-request network phases

use super::PhaseCalculator;
use serde::{Deserialize, Serialize};

/// Value stored in the secure boundaries when a connection had no TLS
/// negotiation. Distinct from 0, which would mean a zero-length handshake.
pub const NOT_APPLICABLE: f64 = -1.0;

/// Internal timing boundaries of one request, on the page clock (ms)
///
/// Archive entries may carry these pre-filled; live instrumentation samples
/// are merged into them otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBoundaries {
    pub dns_start: Option<f64>,
    pub dns_end: Option<f64>,
    pub connect_start: Option<f64>,
    pub connect_end: Option<f64>,
    pub secure_start: Option<f64>,
    pub secure_end: Option<f64>,
    pub request_start: Option<f64>,
    pub response_start: Option<f64>,
    pub response_end: Option<f64>,
}

impl RequestBoundaries {
    /// True when no boundary carries a value
    pub fn is_empty(&self) -> bool {
        [
            self.dns_start,
            self.dns_end,
            self.connect_start,
            self.connect_end,
            self.secure_start,
            self.secure_end,
            self.request_start,
            self.response_start,
            self.response_end,
        ]
        .iter()
        .all(Option::is_none)
    }

    /// Whether the TLS boundaries hold real timestamps
    pub fn has_secure_connection(&self) -> bool {
        matches!(
            (self.secure_start, self.secure_end),
            (Some(s), Some(e)) if s > 0.0 && e > 0.0
        )
    }
}

/// Derived network phases of one request, durations in ms
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestTimings {
    pub dns_time: f64,
    pub dns_pct: f64,
    pub connect_time: f64,
    pub connect_pct: f64,
    pub ssl_time: f64,
    pub ssl_pct: f64,
    pub send_time: f64,
    pub send_pct: f64,
    pub wait_time: f64,
    pub wait_pct: f64,
    pub receive_time: f64,
    pub receive_pct: f64,
    pub total_time: f64,
}

impl RequestTimings {
    /// Compute phases from request boundaries
    ///
    /// Each phase needs both of its boundaries; a missing or non-positive
    /// boundary yields a zero-length phase. The total spans request start to
    /// response end. Send runs from the end of the connection setup (TLS end
    /// when present) to request start.
    pub fn from_boundaries(b: &RequestBoundaries) -> Self {
        let calc = PhaseCalculator::require_pair();

        let dns_time = calc.span(b.dns_start, b.dns_end);
        let connect_time = calc.span(b.connect_start, b.connect_end);
        let ssl_time = calc.span(b.secure_start, b.secure_end);
        // The handshake sits between connect and send when TLS was negotiated
        let send_from = if b.has_secure_connection() {
            b.secure_end
        } else {
            b.connect_end
        };
        let send_time = calc.span(send_from, b.request_start);
        let wait_time = calc.span(b.request_start, b.response_start);
        let receive_time = calc.span(b.response_start, b.response_end);
        let total_time = calc.span(b.request_start, b.response_end);

        Self {
            dns_time,
            dns_pct: calc.optional_percentage(dns_time, total_time),
            connect_time,
            connect_pct: calc.optional_percentage(connect_time, total_time),
            ssl_time,
            ssl_pct: calc.optional_percentage(ssl_time, total_time),
            send_time,
            send_pct: calc.percentage(send_time, total_time),
            wait_time,
            wait_pct: calc.percentage(wait_time, total_time),
            receive_time,
            receive_pct: calc.percentage(receive_time, total_time),
            total_time,
        }
    }
}
