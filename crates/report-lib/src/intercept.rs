//! Request interception policies
//!
//! The browser automation layer installs route handlers for delaying, blocking
//! and re-pointing requests. Engines run the most recently registered handler
//! first, so the order handlers are installed in decides the order they apply.
//! This module makes that order explicit:
//!
//! 1. delay: every matching delay is applied, whatever happens next
//! 2. block: the first matching block aborts the request
//! 3. host override: the first override for the request host re-points it
//!
//! [`InterceptionPlan::registration_order`] gives the installation sequence
//! that produces this evaluation order on a last-registered-runs-first engine.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// Glob pattern matched against the full request URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UrlPattern {
    raw: String,
    pattern: glob::Pattern,
}

impl UrlPattern {
    pub fn new(raw: impl Into<String>) -> Result<Self, PipelineError> {
        let raw = raw.into();
        let pattern = glob::Pattern::new(&raw).map_err(|e| PipelineError::Pattern {
            pattern: raw.clone(),
            reason: e.msg.to_string(),
        })?;
        Ok(Self { raw, pattern })
    }

    pub fn matches(&self, url: &str) -> bool {
        self.pattern.matches(url)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl TryFrom<String> for UrlPattern {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UrlPattern> for String {
    fn from(pattern: UrlPattern) -> Self {
        pattern.raw
    }
}

/// Stage a policy runs in, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterceptionStage {
    Delay,
    Block,
    HostOverride,
}

/// A single route-level policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterceptionPolicy {
    Delay { pattern: UrlPattern, delay_ms: u64 },
    Block { pattern: UrlPattern },
    HostOverride { host: String, address: String },
}

impl InterceptionPolicy {
    pub fn stage(&self) -> InterceptionStage {
        match self {
            InterceptionPolicy::Delay { .. } => InterceptionStage::Delay,
            InterceptionPolicy::Block { .. } => InterceptionStage::Block,
            InterceptionPolicy::HostOverride { .. } => InterceptionStage::HostOverride,
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        match self {
            InterceptionPolicy::Delay { pattern, .. } | InterceptionPolicy::Block { pattern } => {
                pattern.matches(url)
            }
            InterceptionPolicy::HostOverride { host, .. } => url::Url::parse(url)
                .ok()
                .and_then(|u| u.host_str().map(|h| h.eq_ignore_ascii_case(host)))
                .unwrap_or(false),
        }
    }
}

/// What the route layer should do with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    Continue,
    Abort,
    Override { host: String, address: String },
}

/// Outcome of evaluating the plan for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    /// Total injected delay, applied before the action
    pub delay_ms: u64,
    pub action: RouteAction,
}

/// Ordered set of interception policies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptionPlan {
    pub policies: Vec<InterceptionPolicy>,
}

impl InterceptionPlan {
    pub fn new(policies: Vec<InterceptionPolicy>) -> Self {
        Self { policies }
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Policies in the order they are applied. Stable within a stage.
    pub fn evaluation_order(&self) -> Vec<&InterceptionPolicy> {
        let mut ordered: Vec<&InterceptionPolicy> = self.policies.iter().collect();
        ordered.sort_by_key(|p| p.stage());
        ordered
    }

    /// Installation order for an engine that runs the last-registered
    /// handler first
    pub fn registration_order(&self) -> Vec<&InterceptionPolicy> {
        let mut ordered = self.evaluation_order();
        ordered.reverse();
        ordered
    }

    /// Decide what happens to a request for `url`
    pub fn evaluate(&self, url: &str) -> RouteDecision {
        let mut delay_ms = 0u64;

        for policy in self.evaluation_order() {
            if !policy.matches(url) {
                continue;
            }
            match policy {
                InterceptionPolicy::Delay { delay_ms: d, .. } => {
                    delay_ms = delay_ms.saturating_add(*d);
                }
                InterceptionPolicy::Block { .. } => {
                    return RouteDecision {
                        delay_ms,
                        action: RouteAction::Abort,
                    };
                }
                InterceptionPolicy::HostOverride { host, address } => {
                    return RouteDecision {
                        delay_ms,
                        action: RouteAction::Override {
                            host: host.clone(),
                            address: address.clone(),
                        },
                    };
                }
            }
        }

        RouteDecision {
            delay_ms,
            action: RouteAction::Continue,
        }
    }
}
