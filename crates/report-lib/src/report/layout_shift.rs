//! Layout-shift overlays
//!
//! Source rectangles are rescaled into viewport percentages so a renderer can
//! draw them over the final screenshot. The viewport grows to fit any rect
//! that reaches past the configured size, and the same bounds are used for
//! every shift of the run.

use crate::config::Viewport;
use crate::models::{LayoutShiftEntry, Rect};
use crate::phases::PhaseCalculator;
use serde::{Deserialize, Serialize};

/// A rectangle in viewport percentages plus its raw pixel geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledRect {
    pub left_pct: f64,
    pub top_pct: f64,
    pub width_pct: f64,
    pub height_pct: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScaledRect {
    /// `None` for rects with no area
    pub fn scale(rect: &Rect, viewport: Viewport) -> Option<Self> {
        if rect.is_empty() {
            return None;
        }

        let calc = PhaseCalculator::per_field();
        Some(Self {
            left_pct: calc.percentage(rect.x, viewport.width),
            top_pct: calc.percentage(rect.y, viewport.height),
            width_pct: calc.percentage(rect.width, viewport.width),
            height_pct: calc.percentage(rect.height, viewport.height),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftSourceVisual {
    pub node: Option<String>,
    pub previous: Option<ScaledRect>,
    pub current: Option<ScaledRect>,
}

/// One layout shift ready for drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutShiftVisual {
    pub start_time_ms: f64,
    pub value: f64,
    /// Running CLS up to and including this shift
    pub cumulative_score: f64,
    pub had_recent_input: bool,
    pub sources: Vec<ShiftSourceVisual>,
}

/// Viewport large enough for the default size and every reported rect
pub fn viewport_bounds(shifts: &[LayoutShiftEntry], default: Viewport) -> Viewport {
    shifts
        .iter()
        .flat_map(|s| s.sources.iter())
        .flat_map(|src| [src.previous_rect, src.current_rect])
        .flatten()
        .fold(default, |vp, rect| Viewport {
            width: vp.width.max(rect.right_edge()),
            height: vp.height.max(rect.bottom_edge()),
        })
}

/// Build overlays for every shift, keeping only rects with an area
///
/// Sources whose rects are both empty are dropped.
pub fn build_layout_shifts(
    shifts: &[LayoutShiftEntry],
    default: Viewport,
) -> Vec<LayoutShiftVisual> {
    let viewport = viewport_bounds(shifts, default);
    let mut cumulative_score = 0.0;

    shifts
        .iter()
        .map(|shift| {
            if shift.value.is_finite() {
                cumulative_score += shift.value;
            }

            let sources = shift
                .sources
                .iter()
                .filter_map(|src| {
                    let previous = src
                        .previous_rect
                        .as_ref()
                        .and_then(|r| ScaledRect::scale(r, viewport));
                    let current = src
                        .current_rect
                        .as_ref()
                        .and_then(|r| ScaledRect::scale(r, viewport));
                    if previous.is_none() && current.is_none() {
                        return None;
                    }
                    Some(ShiftSourceVisual {
                        node: src.node.clone(),
                        previous,
                        current,
                    })
                })
                .collect();

            LayoutShiftVisual {
                start_time_ms: shift.start_time,
                value: shift.value,
                cumulative_score,
                had_recent_input: shift.had_recent_input,
                sources,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LayoutShiftSource;

    fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
            top: y,
            left: x,
            right: x + width,
            bottom: y + height,
        }
    }

    fn shift(value: f64, previous: Rect, current: Rect) -> LayoutShiftEntry {
        LayoutShiftEntry {
            start_time: 100.0,
            value,
            had_recent_input: false,
            sources: vec![LayoutShiftSource {
                previous_rect: Some(previous),
                current_rect: Some(current),
                node: Some("DIV".to_string()),
            }],
        }
    }

    #[test]
    fn test_full_width_rect_fills_default_viewport() {
        let shifts = vec![shift(0.1, rect(960.0, 0.0, 960.0, 540.0), rect(0.0, 540.0, 1920.0, 540.0))];
        let visuals = build_layout_shifts(&shifts, Viewport::default());

        let current = visuals[0].sources[0].current.unwrap();
        assert_eq!(current.left_pct + current.width_pct, 100.0);
        assert_eq!(current.top_pct, 50.0);

        let previous = visuals[0].sources[0].previous.unwrap();
        assert_eq!(previous.left_pct, 50.0);
        assert_eq!(previous.width_pct, 50.0);
    }

    #[test]
    fn test_oversized_rect_expands_viewport_for_all_shifts() {
        let shifts = vec![
            shift(0.05, rect(0.0, 0.0, 960.0, 100.0), rect(0.0, 0.0, 960.0, 100.0)),
            shift(0.05, rect(0.0, 0.0, 3840.0, 100.0), rect(0.0, 0.0, 3840.0, 100.0)),
        ];

        assert_eq!(viewport_bounds(&shifts, Viewport::default()).width, 3840.0);

        let visuals = build_layout_shifts(&shifts, Viewport::default());
        let first = visuals[0].sources[0].current.unwrap();
        assert_eq!(first.width_pct, 25.0);
        assert_eq!(first.width, 960.0);
    }

    #[test]
    fn test_empty_rects_are_dropped() {
        let shifts = vec![
            shift(0.01, Rect::default(), rect(0.0, 0.0, 100.0, 0.0)),
            shift(0.02, Rect::default(), rect(10.0, 10.0, 100.0, 100.0)),
        ];

        let visuals = build_layout_shifts(&shifts, Viewport::default());
        assert!(visuals[0].sources.is_empty());
        assert_eq!(visuals[1].sources.len(), 1);
        assert!(visuals[1].sources[0].previous.is_none());
        assert!(visuals[1].sources[0].current.is_some());
    }

    #[test]
    fn test_cumulative_score() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        let shifts = vec![shift(0.25, r, r), shift(0.5, r, r), shift(0.125, r, r)];

        let scores: Vec<f64> = build_layout_shifts(&shifts, Viewport::default())
            .iter()
            .map(|v| v.cumulative_score)
            .collect();
        assert_eq!(scores, vec![0.25, 0.75, 0.875]);
    }
}
