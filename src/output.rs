use serde::Serialize;

use crate::batch::{BatchSummary, UnitReport};
use crate::comparator::generate_top_issues;
use crate::config::ComparisonOptions;
use crate::error::ErrorPayload;
use crate::types::{ComparisonOutcome, OverallStatus};

/// Schema version for output payloads.
pub const SPC_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum SpcOutput {
    Compare(CompareOutput),
    Batch(BatchOutput),
    Error(ErrorOutput),
}

impl SpcOutput {
    /// `None` for error envelopes.
    pub fn passed(&self) -> Option<bool> {
        match self {
            SpcOutput::Compare(out) => Some(out.passed),
            SpcOutput::Batch(out) => Some(out.passed),
            SpcOutput::Error(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub design: String,
    pub markup: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareOutput {
    pub version: String,
    pub input: InputDescriptor,
    pub options: ComparisonOptions,
    pub passed: bool,
    pub outcome: ComparisonOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

impl CompareOutput {
    /// Warnings pass; only a failing verdict fails the run.
    pub fn new(
        input: InputDescriptor,
        options: ComparisonOptions,
        outcome: ComparisonOutcome,
        max_issues: usize,
    ) -> Self {
        let top_issues = generate_top_issues(&outcome, max_issues);
        Self {
            version: SPC_OUTPUT_VERSION.to_string(),
            input,
            options,
            passed: outcome.verdict.overall_status != OverallStatus::Fail,
            outcome,
            summary: (!top_issues.is_empty()).then_some(Summary { top_issues }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutput {
    pub version: String,
    pub manifest: String,
    pub passed: bool,
    pub summary: BatchSummary,
    pub units: Vec<UnitReport>,
}

impl BatchOutput {
    /// Units are listed by name so output is stable across runs.
    pub fn new(manifest: String, mut units: Vec<UnitReport>) -> Self {
        units.sort_by(|a, b| a.name.cmp(&b.name));
        let summary = BatchSummary::from_reports(&units);
        Self {
            version: SPC_OUTPUT_VERSION.to_string(),
            manifest,
            passed: summary.is_success(),
            summary,
            units,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::UnitStatus;
    use crate::comparator::compare_trees;
    use crate::error::SpcError;
    use crate::naming::NameResolver;
    use crate::types::{CanonicalElement, ElementKind, Origin};

    fn outcome(design: &[CanonicalElement], implementation: &[CanonicalElement]) -> ComparisonOutcome {
        compare_trees(
            design,
            implementation,
            &ComparisonOptions::default(),
            &NameResolver::default(),
        )
    }

    fn input() -> InputDescriptor {
        InputDescriptor {
            design: "login.json".into(),
            markup: "Login.tsx".into(),
            styles: None,
        }
    }

    #[test]
    fn compare_output_serializes() {
        let design = CanonicalElement::new(
            Origin::Design,
            ElementKind::Text,
            "Title".into(),
            "Title[0]".into(),
        );
        let output = SpcOutput::Compare(CompareOutput::new(
            input(),
            ComparisonOptions::default(),
            outcome(&[design], &[]),
            5,
        ));

        assert_eq!(output.passed(), Some(false));
        let json = serde_json::to_string(&output).expect("serialize compare output");
        assert!(json.contains("\"mode\":\"compare\""));
        assert!(json.contains("\"overallStatus\":\"fail\""));
        assert!(json.contains("\"topIssues\":[\"Missing text"));
        assert!(!json.contains("\"styles\""));
    }

    #[test]
    fn passing_compare_has_no_summary() {
        let output = CompareOutput::new(input(), ComparisonOptions::default(), outcome(&[], &[]), 5);
        assert!(output.passed);
        assert!(output.summary.is_none());
    }

    #[test]
    fn batch_output_sorts_units_and_summarizes() {
        let units = vec![
            UnitReport {
                name: "zeta".into(),
                status: UnitStatus::Skipped {
                    reason: "syntax error".into(),
                },
                duration_ms: 3,
            },
            UnitReport {
                name: "alpha".into(),
                status: UnitStatus::Compared {
                    outcome: outcome(&[], &[]),
                },
                duration_ms: 5,
            },
        ];
        let output = SpcOutput::Batch(BatchOutput::new("batch.yaml".into(), units));

        assert_eq!(output.passed(), Some(true));
        let json = serde_json::to_value(&output).expect("serialize batch output");
        assert_eq!(json["mode"], "batch");
        assert_eq!(json["units"][0]["name"], "alpha");
        assert_eq!(json["units"][0]["status"], "compared");
        assert_eq!(json["units"][1]["status"], "skipped");
        assert_eq!(json["summary"]["skipped"], 1);
    }

    #[test]
    fn error_output_serializes() {
        let payload = SpcError::Config("File not found: a.json".into()).to_payload();
        let output = SpcOutput::Error(ErrorOutput {
            version: SPC_OUTPUT_VERSION.to_string(),
            message: Some(payload.message.clone()),
            error: payload,
        });

        assert_eq!(output.passed(), None);
        let json = serde_json::to_string(&output).expect("serialize error output");
        assert!(json.contains("\"mode\":\"error\""));
        assert!(json.contains("\"category\":\"config\""));
    }
}
