//! Unit coercion for style values coming from CSS text or inline styles.

use crate::types::{format_number, StyleValue};

use super::color::{looks_like_color, normalize_color};

pub const DEFAULT_ROOT_FONT_SIZE: f64 = 16.0;

const KNOWN_UNITS: &[&str] = &["px", "rem", "em", "%", "vh", "vw", "s", "ms"];

/// Split a leading number from its unit, e.g. `"1.5rem"` → `(1.5, "rem")`.
///
/// The whole input must be consumed: `"8px 16px"` is not a single value.
pub fn split_number_unit(raw: &str) -> Option<(f64, &str)> {
    let raw = raw.trim();
    let mut end = 0;
    for (i, c) in raw.char_indices() {
        let sign = (c == '-' || c == '+') && i == 0;
        if c.is_ascii_digit() || c == '.' || sign {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    if end == 0 {
        return None;
    }
    let value: f64 = raw[..end].parse().ok()?;
    let unit = raw[end..].trim();
    if unit.chars().any(|c| c.is_whitespace()) {
        return None;
    }
    if !unit.is_empty() && !unit.chars().all(|c| c.is_ascii_alphabetic() || c == '%') {
        return None;
    }
    Some((value, unit))
}

/// Coerce a raw style string into a [`StyleValue`].
///
/// px and unit-less numbers become `Number`; rem, em and % are converted to
/// pixels against `root_font_size`; other units are kept as `Dimension`;
/// non-numeric input becomes `Color` or `Text`.
pub fn parse_style_value(raw: &str, root_font_size: f64) -> StyleValue {
    let trimmed = raw.trim();
    if let Some((value, unit)) = split_number_unit(trimmed) {
        let unit_lower = unit.to_ascii_lowercase();
        return match unit_lower.as_str() {
            "" | "px" => StyleValue::Number(value),
            "rem" | "em" => StyleValue::Number(value * root_font_size),
            "%" => StyleValue::Number(value / 100.0 * root_font_size),
            _ => StyleValue::Dimension {
                value,
                unit: unit_lower,
            },
        };
    }
    if looks_like_color(trimmed) {
        StyleValue::Color(normalize_color(trimmed))
    } else {
        StyleValue::Text(trimmed.to_string())
    }
}

pub fn is_known_unit(unit: &str) -> bool {
    KNOWN_UNITS.contains(&unit.to_ascii_lowercase().as_str())
}

/// Explicit sides of a `margin`/`padding` shorthand.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSides {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

/// Expand CSS box shorthand (`a`, `a b`, `a b c`, `a b c d`).
pub fn expand_box_shorthand(value: &str) -> Option<BoxSides> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let (top, right, bottom, left) = match parts.as_slice() {
        [a] => (*a, *a, *a, *a),
        [a, b] => (*a, *b, *a, *b),
        [a, b, c] => (*a, *b, *c, *b),
        [a, b, c, d] => (*a, *b, *c, *d),
        _ => return None,
    };
    Some(BoxSides {
        top: top.to_string(),
        right: right.to_string(),
        bottom: bottom.to_string(),
        left: left.to_string(),
    })
}

fn px_text(value: &StyleValue) -> String {
    match value {
        StyleValue::Number(n) => format!("{}px", format_number(*n)),
        other => other.to_string(),
    }
}

/// Canonical form for a box value: uniform sides collapse to one `Number`,
/// anything else becomes `"top right bottom left"` in pixels.
pub fn canonical_box_value(raw: &str, root_font_size: f64) -> StyleValue {
    let Some(sides) = expand_box_shorthand(raw) else {
        return parse_style_value(raw, root_font_size);
    };
    let values = [sides.top, sides.right, sides.bottom, sides.left]
        .map(|s| parse_style_value(&s, root_font_size));
    if values.iter().all(|v| *v == values[0]) {
        return values[0].clone();
    }
    StyleValue::Text(values.iter().map(px_text).collect::<Vec<_>>().join(" "))
}

/// Same canonical form built from four numeric sides.
pub fn box_from_sides(top: f64, right: f64, bottom: f64, left: f64) -> StyleValue {
    if top == right && right == bottom && bottom == left {
        return StyleValue::Number(top);
    }
    StyleValue::Text(
        [top, right, bottom, left]
            .iter()
            .map(|v| format!("{}px", format_number(*v)))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

pub fn is_box_property(property: &str) -> bool {
    matches!(property, "padding" | "margin")
}

/// Coerce a value for a specific property, applying box canonicalization
/// where it applies.
pub fn coerce_property_value(property: &str, raw: &str, root_font_size: f64) -> StyleValue {
    if is_box_property(property) {
        canonical_box_value(raw, root_font_size)
    } else {
        parse_style_value(raw, root_font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_and_unitless_values_become_numbers() {
        assert_eq!(parse_style_value("16px", 16.0), StyleValue::Number(16.0));
        assert_eq!(parse_style_value(" 600 ", 16.0), StyleValue::Number(600.0));
        assert_eq!(parse_style_value("-4px", 16.0), StyleValue::Number(-4.0));
        assert_eq!(parse_style_value(".5px", 16.0), StyleValue::Number(0.5));
    }

    #[test]
    fn relative_units_convert_against_root_size() {
        assert_eq!(parse_style_value("1.5rem", 16.0), StyleValue::Number(24.0));
        assert_eq!(parse_style_value("2em", 10.0), StyleValue::Number(20.0));
        assert_eq!(parse_style_value("50%", 16.0), StyleValue::Number(8.0));
    }

    #[test]
    fn other_units_pass_through() {
        assert_eq!(
            parse_style_value("100vh", 16.0),
            StyleValue::Dimension {
                value: 100.0,
                unit: "vh".into()
            }
        );
        assert_eq!(
            parse_style_value("200ms", 16.0),
            StyleValue::Dimension {
                value: 200.0,
                unit: "ms".into()
            }
        );
        assert_eq!(
            parse_style_value("3fr", 16.0),
            StyleValue::Dimension {
                value: 3.0,
                unit: "fr".into()
            }
        );
        assert!(is_known_unit("VH"));
        assert!(!is_known_unit("fr"));
    }

    #[test]
    fn non_numeric_values_are_text_or_color() {
        assert_eq!(parse_style_value("bold", 16.0), StyleValue::Text("bold".into()));
        assert_eq!(
            parse_style_value("#fafafa", 16.0),
            StyleValue::Color("#FAFAFA".into())
        );
        assert_eq!(
            parse_style_value("8px 16px", 16.0),
            StyleValue::Text("8px 16px".into())
        );
    }

    #[test]
    fn box_shorthand_expands_per_css_rules() {
        let sides = expand_box_shorthand("1px 2px 3px").expect("three values expand");
        assert_eq!(sides.left, "2px");
        assert_eq!(sides.bottom, "3px");
        assert!(expand_box_shorthand("").is_none());
        assert!(expand_box_shorthand("1 2 3 4 5").is_none());
    }

    #[test]
    fn box_values_have_one_canonical_spelling() {
        assert_eq!(canonical_box_value("8px", 16.0), StyleValue::Number(8.0));
        assert_eq!(canonical_box_value("8px 8px", 16.0), StyleValue::Number(8.0));
        assert_eq!(
            canonical_box_value("8px 16px", 16.0),
            StyleValue::Text("8px 16px 8px 16px".into())
        );
        assert_eq!(
            canonical_box_value("0.5rem 1rem", 16.0),
            box_from_sides(8.0, 16.0, 8.0, 16.0)
        );
    }
}
