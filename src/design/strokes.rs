//! Invisible-stroke suppression.
//!
//! Design exports often carry a nominal border that renders invisibly; such
//! strokes are dropped before comparison.

use crate::config::StrokeOverride;
use crate::primitives::{color_distance, normalize_color, parse_rgba, rgb_to_hex};

/// Strokes fainter than this alpha are treated as invisible.
pub const MIN_VISIBLE_STROKE_ALPHA: f64 = 0.05;

/// Strokes closer than this RGB distance to their background are invisible.
pub const MIN_STROKE_BACKGROUND_DISTANCE: f64 = 10.0;

/// A stroke as read from a design node.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeCandidate<'a> {
    pub node_name: &'a str,
    pub color: &'a str,
    /// Explicit opacity; the color's own alpha is used when absent.
    pub opacity: Option<f64>,
}

/// True when the stroke would not be visible over `background`.
pub fn should_suppress_stroke(
    stroke: &StrokeCandidate<'_>,
    background: Option<&str>,
    overrides: &[StrokeOverride],
) -> bool {
    let parsed = parse_rgba(stroke.color);
    let alpha = stroke
        .opacity
        .unwrap_or_else(|| parsed.map(|c| c.alpha).unwrap_or(1.0));
    if alpha < MIN_VISIBLE_STROKE_ALPHA {
        return true;
    }

    let Some(background) = background else {
        return false;
    };

    let stroke_norm = normalize_color(stroke.color);
    let background_norm = normalize_color(background);
    if stroke_norm.eq_ignore_ascii_case(&background_norm) {
        return true;
    }

    if let (Some(s), Some(b)) = (parsed, parse_rgba(background)) {
        if color_distance(&rgb_to_hex(s.rgb), &rgb_to_hex(b.rgb)) < MIN_STROKE_BACKGROUND_DISTANCE {
            return true;
        }
    }

    overrides.iter().any(|o| matches_override(o, stroke, background))
}

fn matches_override(o: &StrokeOverride, stroke: &StrokeCandidate<'_>, background: &str) -> bool {
    o.node_name == stroke.node_name
        && background.contains(o.background.as_str())
        && normalize_color(&o.stroke).eq_ignore_ascii_case(&normalize_color(stroke.color))
}
