//! Comparison result types.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::element::{CanonicalElement, StyleValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMethod {
    ExactPath,
    AliasPath,
    ContentFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Pass,
    Warning,
    Fail,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverallStatus::Pass => "pass",
            OverallStatus::Warning => "warning",
            OverallStatus::Fail => "fail",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedPair {
    pub path: String,
    pub design_element: CanonicalElement,
    pub impl_element: CanonicalElement,
    pub confidence: f64,
    pub property_matches: BTreeMap<String, bool>,
    pub match_method: MatchMethod,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingElement {
    pub path: String,
    pub element: CanonicalElement,
    pub severity: Severity,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraElement {
    pub path: String,
    pub element: CanonicalElement,
    pub severity: Severity,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDifference {
    pub path: String,
    pub property: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_value: Option<StyleValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impl_value: Option<StyleValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<f64>,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub total_elements: usize,
    pub matched_count: usize,
    pub missing_count: usize,
    pub extra_count: usize,
    pub difference_count: usize,
    pub match_rate_percent: f64,
    pub overall_status: OverallStatus,
}

/// Everything one comparison run produces.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonOutcome {
    pub matched_pairs: Vec<MatchedPair>,
    pub missing_in_implementation: Vec<MissingElement>,
    pub extra_in_implementation: Vec<ExtraElement>,
    pub property_differences: Vec<PropertyDifference>,
    pub verdict: Verdict,
}
