use std::collections::BTreeMap;

use crate::config::ComparisonOptions;
use crate::primitives::{colors_equal, values_equal};
use crate::types::{CanonicalElement, StyleValue};

/// Properties that contribute to a matched pair's confidence, in order.
pub const CONFIDENCE_PROPERTIES: &[&str] = &[
    "content",
    "fontSize",
    "fontWeight",
    "color",
    "backgroundColor",
    "padding",
    "gap",
    "borderRadius",
];

pub fn is_color_property(property: &str) -> bool {
    matches!(property, "color" | "backgroundColor")
}

/// Value of `property` on `element`; `content` reads the text content.
pub fn property_value(element: &CanonicalElement, property: &str) -> Option<StyleValue> {
    if property == "content" {
        return element.text_content.clone().map(StyleValue::Text);
    }
    element.style.get(property).cloned()
}

/// Tolerant comparison: colors by RGB distance, everything else through
/// [`values_equal`].
pub fn property_equal(
    property: &str,
    design: Option<&StyleValue>,
    implementation: Option<&StyleValue>,
    options: &ComparisonOptions,
) -> bool {
    if is_color_property(property) {
        return match (design, implementation) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                colors_equal(&a.to_string(), &b.to_string(), options.color_tolerance)
            }
            _ => false,
        };
    }
    values_equal(design, implementation, options.tolerance, Some(property))
}

/// Confidence in [0, 1] plus the per-property results it was computed from.
/// Properties absent on both sides are not compared; with nothing to
/// compare the confidence is 1.
pub fn score_pair(
    design: &CanonicalElement,
    implementation: &CanonicalElement,
    options: &ComparisonOptions,
) -> (f64, BTreeMap<String, bool>) {
    let mut results = BTreeMap::new();
    for &property in CONFIDENCE_PROPERTIES {
        if options.is_ignored(property) {
            continue;
        }
        let d = property_value(design, property);
        let i = property_value(implementation, property);
        if d.is_none() && i.is_none() {
            continue;
        }
        let equal = property_equal(property, d.as_ref(), i.as_ref(), options);
        results.insert(property.to_string(), equal);
    }
    let compared = results.len();
    let confidence = if compared == 0 {
        1.0
    } else {
        results.values().filter(|m| **m).count() as f64 / compared as f64
    };
    (confidence, results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ElementKind, Origin};

    fn element(origin: Origin, props: &[(&str, StyleValue)]) -> CanonicalElement {
        let mut el = CanonicalElement::new(origin, ElementKind::Text, "title".into(), "T".into());
        for (k, v) in props {
            el.style.insert(k.to_string(), v.clone());
        }
        el
    }

    #[test]
    fn nothing_to_compare_is_full_confidence() {
        let d = element(Origin::Design, &[]);
        let i = element(Origin::Implementation, &[]);
        let (confidence, results) = score_pair(&d, &i, &ComparisonOptions::default());
        assert_eq!(confidence, 1.0);
        assert!(results.is_empty());
    }

    #[test]
    fn one_sided_properties_count_as_mismatches() {
        let d = element(
            Origin::Design,
            &[
                ("fontSize", StyleValue::Number(16.0)),
                ("color", StyleValue::Color("#000000".into())),
            ],
        );
        let i = element(Origin::Implementation, &[("fontSize", StyleValue::Number(16.5))]);
        let (confidence, results) = score_pair(&d, &i, &ComparisonOptions::default());
        assert_eq!(confidence, 0.5);
        assert_eq!(results.get("fontSize"), Some(&true));
        assert_eq!(results.get("color"), Some(&false));
    }

    #[test]
    fn ignored_properties_leave_the_denominator() {
        let d = element(Origin::Design, &[("gap", StyleValue::Number(8.0))]);
        let i = element(Origin::Implementation, &[("gap", StyleValue::Number(24.0))]);
        let options = ComparisonOptions {
            ignore_properties: vec!["gap".into()],
            ..ComparisonOptions::default()
        };
        let (confidence, results) = score_pair(&d, &i, &options);
        assert_eq!(confidence, 1.0);
        assert!(!results.contains_key("gap"));
    }

    #[test]
    fn colors_use_the_color_tolerance() {
        let a = StyleValue::Color("#000000".into());
        let b = StyleValue::Color("#0A0A0A".into());
        let mut options = ComparisonOptions::default();
        assert!(!property_equal("color", Some(&a), Some(&b), &options));
        options.color_tolerance = 20.0;
        assert!(property_equal("color", Some(&a), Some(&b), &options));
        assert!(property_equal("color", Some(&b), Some(&a), &options));
    }
}
