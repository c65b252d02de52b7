use crate::types::{
    ExtraElement, MatchedPair, MissingElement, OverallStatus, PropertyDifference, Severity,
    Verdict,
};

/// Pairs below this confidence are reported but not counted as matched.
pub const MATCH_CONFIDENCE_THRESHOLD: f64 = 0.5;

pub fn summarize(
    matched: &[MatchedPair],
    missing: &[MissingElement],
    extra: &[ExtraElement],
    differences: &[PropertyDifference],
) -> Verdict {
    let matched_count = matched
        .iter()
        .filter(|p| p.confidence >= MATCH_CONFIDENCE_THRESHOLD)
        .count();
    let missing_count = missing.iter().filter(|m| m.severity == Severity::Error).count();
    let extra_count = extra.iter().filter(|e| e.severity == Severity::Error).count();
    let difference_count = differences
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();

    let total_elements = matched.len() + missing.len() + extra.len();
    let match_rate_percent = if total_elements == 0 {
        100.0
    } else {
        (matched_count as f64 / total_elements as f64 * 100.0).clamp(0.0, 100.0)
    };

    let overall_status = if missing_count > 0 || extra_count > 0 || difference_count > 0 {
        OverallStatus::Fail
    } else if !extra.is_empty() {
        OverallStatus::Warning
    } else {
        OverallStatus::Pass
    };

    Verdict {
        total_elements,
        matched_count,
        missing_count,
        extra_count,
        difference_count,
        match_rate_percent,
        overall_status,
    }
}
