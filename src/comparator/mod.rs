//! Tree comparison: alignment, classification, property diffs and verdict.
//!
//! One call to [`compare_trees`] is one run. Nothing is cached between runs.

pub mod alignment;
pub mod index;
pub mod issues;
pub mod scoring;
pub mod style_diff;
pub mod summary;


pub use alignment::align_paths;
pub use issues::generate_top_issues;
pub use scoring::{score_pair, CONFIDENCE_PROPERTIES};
pub use style_diff::{diff_styles, severity_for, CRITICAL_PROPERTIES};
pub use summary::{summarize, MATCH_CONFIDENCE_THRESHOLD};

use std::collections::BTreeSet;

use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{ComparisonOptions, SeverityMode};
use crate::naming::NameResolver;
use crate::types::{
    CanonicalElement, ComparisonOutcome, ExtraElement, MatchMethod, MatchedPair, MissingElement,
    Severity,
};

use index::{flatten, index_by_content, index_by_path};

/// Confidence recorded for pairs matched by text content alone.
pub const CONTENT_FALLBACK_CONFIDENCE: f64 = 0.7;

/// Compare a design forest against an implementation forest.
pub fn compare_trees(
    design: &[CanonicalElement],
    implementation: &[CanonicalElement],
    options: &ComparisonOptions,
    resolver: &NameResolver,
) -> ComparisonOutcome {
    let design_elements = flatten(design);
    let impl_elements = flatten(implementation);
    let design_index = index_by_path(&design_elements);
    let impl_index = index_by_path(&impl_elements);
    let alignment = align_paths(&design_index, &impl_index, resolver);
    let aligned_impl: BTreeSet<&str> = alignment.values().copied().collect();

    let mut matched_pairs = Vec::new();
    let mut property_differences = Vec::new();
    let mut design_only: Vec<&CanonicalElement> = Vec::new();

    for (&path, &d) in &design_index {
        let counterpart = match impl_index.get(path) {
            Some(&i) => Some((i, MatchMethod::ExactPath)),
            None => alignment
                .get(path)
                .and_then(|impl_path| impl_index.get(impl_path))
                .map(|&i| (i, MatchMethod::AliasPath)),
        };
        match counterpart {
            Some((i, method)) => {
                let (confidence, property_matches) = score_pair(d, i, options);
                property_differences.extend(diff_styles(path, d, i, options));
                matched_pairs.push(pair(path, d, i, confidence, property_matches, method));
            }
            None => design_only.push(d),
        }
    }

    // Unmatched elements in encounter order, so fallback candidates are
    // tried in the order they appear in the source. Repeats of an indexed
    // path never pair by path and stay in this list.
    let impl_only: Vec<&CanonicalElement> = impl_elements
        .iter()
        .copied()
        .filter(|e| {
            let path = e.path.as_str();
            let first = impl_index.get(path).is_some_and(|f| std::ptr::eq(*f, *e));
            !first || (!design_index.contains_key(path) && !aligned_impl.contains(path))
        })
        .collect();

    let impl_content = index_by_content(&impl_only);
    let mut claimed_impl: BTreeSet<Uuid> = BTreeSet::new();
    let mut unmatched_design: Vec<&CanonicalElement> = Vec::new();

    for d in design_only {
        let candidate = d.content_key().and_then(|key| {
            pick_candidate(d, impl_content.get(&key), |c| claimed_impl.contains(&c.id))
        });
        match candidate {
            Some(i) => {
                claimed_impl.insert(i.id);
                matched_pairs.push(content_pair(d, i, options));
            }
            None => unmatched_design.push(d),
        }
    }

    let design_content = index_by_content(&unmatched_design);
    let mut claimed_design: BTreeSet<Uuid> = BTreeSet::new();
    let mut extra_in_implementation = Vec::new();

    for i in impl_only {
        if claimed_impl.contains(&i.id) {
            continue;
        }
        let candidate = i.content_key().and_then(|key| {
            pick_candidate(i, design_content.get(&key), |c| claimed_design.contains(&c.id))
        });
        match candidate {
            Some(d) => {
                claimed_design.insert(d.id);
                matched_pairs.push(content_pair(d, i, options));
            }
            None => {
                let duplicate = impl_index
                    .get(i.path.as_str())
                    .is_some_and(|first| !std::ptr::eq(*first, i));
                extra_in_implementation.push(extra_entry(i, options.severity_mode, duplicate));
            }
        }
    }

    let missing_in_implementation: Vec<MissingElement> = unmatched_design
        .into_iter()
        .filter(|d| !claimed_design.contains(&d.id))
        .map(missing_entry)
        .collect();

    let verdict = summarize(
        &matched_pairs,
        &missing_in_implementation,
        &extra_in_implementation,
        &property_differences,
    );
    info!(
        matched = verdict.matched_count,
        missing = missing_in_implementation.len(),
        extra = extra_in_implementation.len(),
        differences = property_differences.len(),
        status = %verdict.overall_status,
        "comparison complete"
    );

    ComparisonOutcome {
        matched_pairs,
        missing_in_implementation,
        extra_in_implementation,
        property_differences,
        verdict,
    }
}

/// Same-kind candidate first, else the first unclaimed one.
fn pick_candidate<'a, F>(
    element: &CanonicalElement,
    candidates: Option<&Vec<&'a CanonicalElement>>,
    is_claimed: F,
) -> Option<&'a CanonicalElement>
where
    F: Fn(&CanonicalElement) -> bool,
{
    let open: Vec<&'a CanonicalElement> = candidates?
        .iter()
        .copied()
        .filter(|c| !is_claimed(*c))
        .collect();
    open.iter()
        .find(|c| c.kind == element.kind)
        .or_else(|| open.first())
        .copied()
}

fn pair(
    path: &str,
    design: &CanonicalElement,
    implementation: &CanonicalElement,
    confidence: f64,
    property_matches: std::collections::BTreeMap<String, bool>,
    match_method: MatchMethod,
) -> MatchedPair {
    MatchedPair {
        path: path.to_string(),
        design_element: design.shallow(),
        impl_element: implementation.shallow(),
        confidence,
        property_matches,
        match_method,
    }
}

fn content_pair(
    design: &CanonicalElement,
    implementation: &CanonicalElement,
    options: &ComparisonOptions,
) -> MatchedPair {
    debug!(
        design = %design.path,
        implementation = %implementation.path,
        "matched by content"
    );
    let (_, property_matches) = score_pair(design, implementation, options);
    pair(
        &design.path,
        design,
        implementation,
        CONTENT_FALLBACK_CONFIDENCE,
        property_matches,
        MatchMethod::ContentFallback,
    )
}

fn missing_entry(element: &CanonicalElement) -> MissingElement {
    MissingElement {
        path: element.path.clone(),
        element: element.shallow(),
        severity: Severity::Error,
        reason: format!(
            "No implementation element at `{}` or with matching content",
            element.path
        ),
        suggested_fix: Some(suggest_fix(element)),
    }
}

fn suggest_fix(element: &CanonicalElement) -> String {
    let mut fix = format!("Add a {} element named `{}`", element.kind, element.name);
    if let Some(text) = &element.text_content {
        fix.push_str(&format!(" with text \"{}\"", text));
    }
    if let Some(counterpart) = &element.provenance.opaque_counterpart_name {
        fix.push_str(&format!(" rendering <{} />", counterpart));
    }
    fix
}

fn extra_entry(element: &CanonicalElement, mode: SeverityMode, duplicate: bool) -> ExtraElement {
    let severity = match mode {
        SeverityMode::Strict => Severity::Error,
        _ => Severity::Warning,
    };
    ExtraElement {
        path: element.path.clone(),
        element: element.shallow(),
        severity,
        reason: if duplicate {
            "Implementation element repeats a path already compared".to_string()
        } else {
            "Implementation element has no design counterpart".to_string()
        },
    }
}
