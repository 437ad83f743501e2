//! Core data models for the report pipeline
//!
//! Two groups live here: the raw shapes produced by the in-page metrics
//! collector and the console capture (camelCase on disk), and the canonical
//! request record produced by the merge step.

use crate::phases::RequestTimings;
use serde::{Deserialize, Serialize};

/// Timing sample for one request from live instrumentation
///
/// All timestamps are absolute on the page clock, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTimingSample {
    pub url: String,
    pub dns_start: Option<f64>,
    pub dns_end: Option<f64>,
    pub connect_start: Option<f64>,
    pub connect_end: Option<f64>,
    pub secure_connection_start: Option<f64>,
    pub request_start: Option<f64>,
    pub response_start: Option<f64>,
    pub response_end: Option<f64>,
}

/// Everything the in-page observers hand back after the load
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsBlob {
    pub navigation: Option<NavigationTiming>,
    pub paint: Vec<PaintEntry>,
    pub lcp: Vec<LcpEntry>,
    pub layout_shifts: Vec<LayoutShiftEntry>,
}

/// Navigation timing record for the main document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationTiming {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub navigation_type: Option<String>,
    pub start_time: Option<f64>,
    pub domain_lookup_start: Option<f64>,
    pub domain_lookup_end: Option<f64>,
    pub connect_start: Option<f64>,
    pub connect_end: Option<f64>,
    pub secure_connection_start: Option<f64>,
    pub request_start: Option<f64>,
    pub response_start: Option<f64>,
    pub response_end: Option<f64>,
    pub dom_interactive: Option<f64>,
    pub dom_content_loaded_event_start: Option<f64>,
    pub dom_content_loaded_event_end: Option<f64>,
    pub dom_complete: Option<f64>,
    pub load_event_start: Option<f64>,
    pub load_event_end: Option<f64>,
    pub transfer_size: Option<f64>,
}

/// Paint timing entry (`first-paint`, `first-contentful-paint`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaintEntry {
    pub name: String,
    pub start_time: f64,
}

/// Largest-Contentful-Paint candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LcpEntry {
    pub start_time: f64,
    pub render_time: Option<f64>,
    pub load_time: Option<f64>,
    pub size: Option<f64>,
    /// Resource URL of the element, empty for text
    pub url: Option<String>,
    pub element: Option<String>,
}

/// Layout-shift event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutShiftEntry {
    pub start_time: f64,
    pub value: f64,
    pub had_recent_input: bool,
    pub sources: Vec<LayoutShiftSource>,
}

/// Element that moved during a layout shift
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutShiftSource {
    pub previous_rect: Option<Rect>,
    pub current_rect: Option<Rect>,
    pub node: Option<String>,
}

/// DOMRect as serialized by the page, in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Rect {
    /// Right edge, falling back to `x + width` when `right` was not reported
    pub fn right_edge(&self) -> f64 {
        self.right.max(self.x + self.width)
    }

    /// Bottom edge, falling back to `y + height` when `bottom` was not reported
    pub fn bottom_edge(&self) -> f64 {
        self.bottom.max(self.y + self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// Console message as captured from the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub text: String,
    pub location: Option<ConsoleLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleLocation {
    pub url: String,
    pub line_number: Option<u32>,
    pub column_number: Option<u32>,
}

/// Resource type derived from a MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Document,
    Stylesheet,
    Script,
    Image,
    Font,
    Json,
    Media,
    Other,
}

impl ResourceType {
    /// Classify a MIME type string. Unknown or missing types map to `Other`.
    pub fn from_mime(mime: Option<&str>) -> Self {
        let Some(mime) = mime else {
            return ResourceType::Other;
        };
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence.is_empty() {
            ResourceType::Other
        } else if essence.contains("html") {
            ResourceType::Document
        } else if essence.contains("css") {
            ResourceType::Stylesheet
        } else if essence.contains("javascript")
            || essence.contains("ecmascript")
            || essence.ends_with("/js")
        {
            ResourceType::Script
        } else if essence.starts_with("image/") || essence.contains("svg") {
            ResourceType::Image
        } else if essence.starts_with("font/")
            || ["woff", "ttf", "otf", "opentype", "truetype", "fontobject"]
                .iter()
                .any(|f| essence.contains(f))
        {
            ResourceType::Font
        } else if essence.contains("json") {
            ResourceType::Json
        } else if essence.starts_with("video/") {
            ResourceType::Media
        } else {
            ResourceType::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Document => "document",
            ResourceType::Stylesheet => "stylesheet",
            ResourceType::Script => "script",
            ResourceType::Image => "image",
            ResourceType::Font => "font",
            ResourceType::Json => "json",
            ResourceType::Media => "media",
            ResourceType::Other => "other",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "document" => Ok(ResourceType::Document),
            "stylesheet" => Ok(ResourceType::Stylesheet),
            "script" => Ok(ResourceType::Script),
            "image" => Ok(ResourceType::Image),
            "font" => Ok(ResourceType::Font),
            "json" => Ok(ResourceType::Json),
            "media" => Ok(ResourceType::Media),
            "other" => Ok(ResourceType::Other),
            other => Err(format!("unknown resource type '{}'", other)),
        }
    }
}

/// Canonical request record after parsing and merging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRequestRecord {
    pub url: String,
    pub method: String,
    pub status: u16,
    pub size_bytes: u64,
    pub mime_type: Option<String>,
    pub resource_type: ResourceType,
    /// Offset from the first archive entry (ms)
    pub start_offset_ms: f64,
    /// Elapsed time reported by the archive (ms)
    pub duration_ms: Option<f64>,
    pub timings: RequestTimings,
    /// Whether live instrumentation contributed the timing boundaries
    pub enriched: bool,
    pub is_lcp: bool,
}

impl EnrichedRequestRecord {
    /// Duration used for waterfall layout
    pub fn effective_duration(&self) -> f64 {
        self.duration_ms
            .unwrap_or_else(|| self.timings.total_time.max(0.0))
    }
}
