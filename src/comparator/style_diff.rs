use std::collections::BTreeSet;

use crate::config::{ComparisonOptions, SeverityMode};
use crate::primitives::{color_distance, hex_to_rgb, numeric_magnitude};
use crate::types::{CanonicalElement, PropertyDifference, Severity, StyleValue};

use super::scoring::{is_color_property, property_equal, property_value};

/// Properties whose differences are errors in normal mode.
pub const CRITICAL_PROPERTIES: &[&str] = &[
    "content",
    "fontSize",
    "fontWeight",
    "color",
    "backgroundColor",
    "padding",
    "gap",
];

pub fn severity_for(property: &str, mode: SeverityMode) -> Severity {
    match mode {
        SeverityMode::Strict => Severity::Error,
        SeverityMode::Lenient => Severity::Info,
        SeverityMode::Normal if CRITICAL_PROPERTIES.contains(&property) => Severity::Error,
        SeverityMode::Normal => Severity::Warning,
    }
}

/// Absolute difference for numbers, RGB distance for hex colors.
pub fn difference_magnitude(
    property: &str,
    design: &StyleValue,
    implementation: &StyleValue,
) -> Option<f64> {
    if let Some(m) = numeric_magnitude(design, implementation) {
        return Some(m);
    }
    if is_color_property(property) {
        let (a, b) = (design.to_string(), implementation.to_string());
        if hex_to_rgb(&a).is_some() && hex_to_rgb(&b).is_some() {
            return Some(color_distance(&a, &b));
        }
    }
    None
}

/// Property differences between a matched pair: exact text content, then
/// the union of both style maps.
pub fn diff_styles(
    path: &str,
    design: &CanonicalElement,
    implementation: &CanonicalElement,
    options: &ComparisonOptions,
) -> Vec<PropertyDifference> {
    let mut diffs = Vec::new();

    if !options.is_ignored("content") && design.text_content != implementation.text_content {
        diffs.push(PropertyDifference {
            path: path.to_string(),
            property: "content".to_string(),
            design_value: property_value(design, "content"),
            impl_value: property_value(implementation, "content"),
            magnitude: None,
            severity: severity_for("content", options.severity_mode),
        });
    }

    let properties: BTreeSet<&str> = design
        .style
        .keys()
        .chain(implementation.style.keys())
        .map(String::as_str)
        .filter(|p| !options.is_ignored(p))
        .collect();

    for property in properties {
        let d = design.style.get(property);
        let i = implementation.style.get(property);
        if property_equal(property, d, i, options) {
            continue;
        }
        let magnitude = match (d, i) {
            (Some(a), Some(b)) => difference_magnitude(property, a, b),
            _ => None,
        };
        diffs.push(PropertyDifference {
            path: path.to_string(),
            property: property.to_string(),
            design_value: d.cloned(),
            impl_value: i.cloned(),
            magnitude,
            severity: severity_for(property, options.severity_mode),
        });
    }
    diffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ElementKind, Origin};

    fn element(origin: Origin, text: Option<&str>, props: &[(&str, StyleValue)]) -> CanonicalElement {
        let mut el = CanonicalElement::new(origin, ElementKind::Text, "title".into(), "T".into());
        el.text_content = text.map(str::to_string);
        for (k, v) in props {
            el.style.insert(k.to_string(), v.clone());
        }
        el
    }

    #[test]
    fn severity_follows_mode_and_critical_set() {
        assert_eq!(severity_for("borderRadius", SeverityMode::Strict), Severity::Error);
        assert_eq!(severity_for("fontSize", SeverityMode::Lenient), Severity::Info);
        assert_eq!(severity_for("fontSize", SeverityMode::Normal), Severity::Error);
        assert_eq!(severity_for("borderRadius", SeverityMode::Normal), Severity::Warning);
    }

    #[test]
    fn content_is_compared_exactly() {
        let d = element(Origin::Design, Some("Sign in"), &[]);
        let i = element(Origin::Implementation, Some("Sign In"), &[]);
        let diffs = diff_styles("T", &d, &i, &ComparisonOptions::default());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].property, "content");
        assert_eq!(diffs[0].severity, Severity::Error);

        let options = ComparisonOptions {
            ignore_properties: vec!["content".into()],
            ..ComparisonOptions::default()
        };
        assert!(diff_styles("T", &d, &i, &options).is_empty());
    }

    #[test]
    fn magnitudes_are_attached() {
        let d = element(
            Origin::Design,
            None,
            &[
                ("fontSize", StyleValue::Number(16.0)),
                ("color", StyleValue::Color("#000000".into())),
                ("borderRadius", StyleValue::Number(4.0)),
                ("display", StyleValue::Text("flex".into())),
            ],
        );
        let i = element(
            Origin::Implementation,
            None,
            &[
                ("fontSize", StyleValue::Number(20.0)),
                ("color", StyleValue::Color("#FF0000".into())),
                ("borderRadius", StyleValue::Number(4.5)),
            ],
        );
        let diffs = diff_styles("T", &d, &i, &ComparisonOptions::default());
        let props: Vec<&str> = diffs.iter().map(|d| d.property.as_str()).collect();
        assert_eq!(props, vec!["color", "display", "fontSize"]);

        assert_eq!(diffs[0].magnitude, Some(255.0));
        assert_eq!(diffs[1].magnitude, None);
        assert_eq!(diffs[1].severity, Severity::Warning);
        assert!(diffs[1].impl_value.is_none());
        assert_eq!(diffs[2].magnitude, Some(4.0));
        assert_eq!(diffs[2].severity, Severity::Error);
    }
}
