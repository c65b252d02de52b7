use crate::types::StyleValue;

/// Integer font weight: `"normal"` is 400, numeric strings are parsed and
/// fractional weights truncate.
fn font_weight(value: &StyleValue) -> Option<i64> {
    match value {
        StyleValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
        StyleValue::Text(s) | StyleValue::Color(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("normal") {
                return Some(400);
            }
            let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

/// Tolerant equality for two optional style values.
pub fn values_equal(
    a: Option<&StyleValue>,
    b: Option<&StyleValue>,
    tolerance: f64,
    property_hint: Option<&str>,
) -> bool {
    let (a, b) = match (a, b) {
        (None, None) => return true,
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };
    if a == b {
        return true;
    }
    if property_hint == Some("fontWeight") {
        return match (font_weight(a), font_weight(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        };
    }
    match (a, b) {
        (StyleValue::Number(x), StyleValue::Number(y)) => (x - y).abs() <= tolerance,
        (
            StyleValue::Dimension { value: x, unit: ux },
            StyleValue::Dimension { value: y, unit: uy },
        ) => ux == uy && (x - y).abs() <= tolerance,
        (
            StyleValue::Text(x) | StyleValue::Color(x),
            StyleValue::Text(y) | StyleValue::Color(y),
        ) => x.eq_ignore_ascii_case(y),
        _ => false,
    }
}

/// Absolute difference for numeric pairs.
pub fn numeric_magnitude(a: &StyleValue, b: &StyleValue) -> Option<f64> {
    match (a, b) {
        (StyleValue::Number(x), StyleValue::Number(y)) => Some((x - y).abs()),
        (
            StyleValue::Dimension { value: x, unit: ux },
            StyleValue::Dimension { value: y, unit: uy },
        ) if ux == uy => Some((x - y).abs()),
        _ => None,
    }
}
