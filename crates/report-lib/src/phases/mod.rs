//! Timing phase calculation
//!
//! Turns a chain of monotonically increasing timestamps into named,
//! non-overlapping durations and their share of a total. The same arithmetic
//! backs page-level navigation phases and per-request network phases; the two
//! differ only in how a missing boundary is treated.

mod page;
mod request;

pub use page::{PagePhase, TimingPhases};
pub use request::{RequestBoundaries, RequestTimings, NOT_APPLICABLE};

/// How a missing boundary affects a phase duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// A missing boundary counts as 0 on its own. Inconsistent capture data can
    /// produce negative durations, which are passed through untouched.
    PerField,
    /// A phase is 0 unless both boundaries are present and greater than zero.
    /// Values <= 0 (including the -1 "not applicable" sentinel) are absent.
    RequirePair,
}

/// Computes phase durations and percentages under a boundary policy
#[derive(Debug, Clone, Copy)]
pub struct PhaseCalculator {
    policy: BoundaryPolicy,
}

impl PhaseCalculator {
    pub fn new(policy: BoundaryPolicy) -> Self {
        Self { policy }
    }

    /// Calculator for page-level navigation phases
    pub fn per_field() -> Self {
        Self::new(BoundaryPolicy::PerField)
    }

    /// Calculator for per-request network phases
    pub fn require_pair() -> Self {
        Self::new(BoundaryPolicy::RequirePair)
    }

    /// Duration between two boundaries
    ///
    /// Non-finite boundaries are treated as missing so the result is always
    /// finite.
    pub fn span(&self, start: Option<f64>, end: Option<f64>) -> f64 {
        let start = start.filter(|v| v.is_finite());
        let end = end.filter(|v| v.is_finite());

        match self.policy {
            BoundaryPolicy::PerField => end.unwrap_or(0.0) - start.unwrap_or(0.0),
            BoundaryPolicy::RequirePair => match (start, end) {
                (Some(s), Some(e)) if s > 0.0 && e > 0.0 => e - s,
                _ => 0.0,
            },
        }
    }

    /// Share of `total` taken by `duration`, in percent
    pub fn percentage(&self, duration: f64, total: f64) -> f64 {
        percentage_of(duration, total)
    }

    /// Like [`percentage`](Self::percentage), but 0 when the phase itself has
    /// no positive duration. Used for phases that are often legitimately absent
    /// (DNS, connect, TLS on a reused connection).
    pub fn optional_percentage(&self, duration: f64, total: f64) -> f64 {
        if duration > 0.0 {
            percentage_of(duration, total)
        } else {
            0.0
        }
    }
}

fn percentage_of(duration: f64, total: f64) -> f64 {
    if !total.is_finite() || total <= 0.0 || !duration.is_finite() {
        return 0.0;
    }
    duration / total * 100.0
}
