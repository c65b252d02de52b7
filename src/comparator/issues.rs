use crate::types::{ComparisonOutcome, MatchMethod, Severity};

const PRIORITY_MISSING: u8 = 0;
const PRIORITY_PROPERTY: u8 = 1;
const PRIORITY_EXTRA: u8 = 2;
const PRIORITY_MATCH: u8 = 3;

#[derive(Debug, Clone)]
struct RankedIssue {
    severity_rank: u8,
    priority_rank: u8,
    message: String,
}

impl RankedIssue {
    fn new(severity: Severity, priority_rank: u8, message: impl Into<String>) -> Self {
        Self {
            severity_rank: severity_rank(severity),
            priority_rank,
            message: message.into(),
        }
    }
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
    }
}

/// Human-readable issue lines, most severe first.
pub fn generate_top_issues(outcome: &ComparisonOutcome, max_issues: usize) -> Vec<String> {
    let mut issues: Vec<RankedIssue> = Vec::new();

    for missing in &outcome.missing_in_implementation {
        let hint = missing
            .suggested_fix
            .as_deref()
            .map(|fix| format!(" {fix}."))
            .unwrap_or_default();
        issues.push(RankedIssue::new(
            missing.severity,
            PRIORITY_MISSING,
            format!(
                "Missing {} at `{}`.{}",
                missing.element.kind, missing.path, hint
            ),
        ));
    }

    for diff in &outcome.property_differences {
        let design = diff
            .design_value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(none)".to_string());
        let implementation = diff
            .impl_value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(none)".to_string());
        let delta = diff
            .magnitude
            .map(|m| format!(" (off by {:.1})", m))
            .unwrap_or_default();
        issues.push(RankedIssue::new(
            diff.severity,
            PRIORITY_PROPERTY,
            format!(
                "`{}` {}: design {} vs implementation {}{}.",
                diff.path, diff.property, design, implementation, delta
            ),
        ));
    }

    for extra in &outcome.extra_in_implementation {
        issues.push(RankedIssue::new(
            extra.severity,
            PRIORITY_EXTRA,
            format!(
                "Extra {} at `{}` has no design counterpart.",
                extra.element.kind, extra.path
            ),
        ));
    }

    for pair in &outcome.matched_pairs {
        if pair.match_method == MatchMethod::ContentFallback {
            issues.push(RankedIssue::new(
                Severity::Info,
                PRIORITY_MATCH,
                format!(
                    "`{}` matched `{}` by text only ({:.0}% confidence); check naming.",
                    pair.path,
                    pair.impl_element.path,
                    pair.confidence * 100.0
                ),
            ));
        }
    }

    issues.sort_by(|a, b| {
        a.severity_rank
            .cmp(&b.severity_rank)
            .then_with(|| a.priority_rank.cmp(&b.priority_rank))
            .then_with(|| a.message.cmp(&b.message))
    });
    issues
        .into_iter()
        .take(max_issues)
        .map(|i| i.message)
        .collect()
}
