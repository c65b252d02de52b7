use palette::{LinSrgb, Srgb};

/// 8-bit sRGB triple.
pub type Rgb = Srgb<u8>;

/// Distance reported when one side cannot be parsed: the RGB cube diagonal.
pub const UNPARSABLE_COLOR_DISTANCE: f64 = 441.672_955_930_063_7; // 255 * sqrt(3)

/// Parse `#RRGGBB`. Short forms and named colors are not accepted.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.trim().strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Srgb::new(channel(0)?, channel(2)?, channel(4)?))
}

pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb.red, rgb.green, rgb.blue)
}

fn rgb_distance(a: Rgb, b: Rgb) -> f64 {
    let dr = a.red as f64 - b.red as f64;
    let dg = a.green as f64 - b.green as f64;
    let db = a.blue as f64 - b.blue as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Euclidean RGB distance between two hex colors.
pub fn color_distance(a: &str, b: &str) -> f64 {
    if a == b {
        return 0.0;
    }
    match (hex_to_rgb(a), hex_to_rgb(b)) {
        (Some(x), Some(y)) => rgb_distance(x, y),
        _ => UNPARSABLE_COLOR_DISTANCE,
    }
}

pub fn colors_equal(a: &str, b: &str, tolerance: f64) -> bool {
    a == b || color_distance(a, b) <= tolerance
}

/// A color with alpha, parsed from hex or `rgb()`/`rgba()` notation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

/// Broader parser used by stroke suppression: `#RRGGBB`, `#RRGGBBAA`,
/// `#RGB`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
pub fn parse_rgba(value: &str) -> Option<Rgba> {
    let value = value.trim();
    if let Some(digits) = value.strip_prefix('#') {
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return match digits.len() {
            3 => {
                let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
                hex_to_rgb(&format!("#{expanded}")).map(|rgb| Rgba { rgb, alpha: 1.0 })
            }
            6 => hex_to_rgb(value).map(|rgb| Rgba { rgb, alpha: 1.0 }),
            8 => {
                let rgb = hex_to_rgb(&value[..7])?;
                let alpha = u8::from_str_radix(&digits[6..8], 16).ok()? as f64 / 255.0;
                Some(Rgba { rgb, alpha })
            }
            _ => None,
        };
    }

    let lower = value.to_ascii_lowercase();
    let inner = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        Some(v.round().clamp(0.0, 255.0) as u8)
    };
    let alpha = match parts.get(3) {
        Some(a) if a.ends_with('%') => a.trim_end_matches('%').parse::<f64>().ok()? / 100.0,
        Some(a) => a.parse::<f64>().ok()?,
        None => 1.0,
    };
    Some(Rgba {
        rgb: Srgb::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?),
        alpha: alpha.clamp(0.0, 1.0),
    })
}

/// Canonical spelling for a color value at the parsing boundary.
///
/// Opaque colors become upper-case `#RRGGBB`. Translucent colors become
/// `rgba(r, g, b, a)` with alpha rounded to two decimals. Anything
/// unrecognized is returned trimmed but otherwise verbatim.
pub fn normalize_color(value: &str) -> String {
    let trimmed = value.trim();
    match parse_rgba(trimmed) {
        Some(c) => rgba_to_css(c),
        None => trimmed.to_string(),
    }
}

pub fn rgba_to_css(color: Rgba) -> String {
    let alpha = (color.alpha * 100.0).round() / 100.0;
    if alpha >= 1.0 {
        return rgb_to_hex(color.rgb);
    }
    format!(
        "rgba({}, {}, {}, {})",
        color.rgb.red, color.rgb.green, color.rgb.blue, alpha
    )
}

const NAMED_COLORS: &[&str] = &[
    "black",
    "white",
    "transparent",
    "red",
    "green",
    "blue",
    "gray",
    "grey",
    "currentcolor",
];

pub fn looks_like_color(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower.starts_with('#')
        || lower.starts_with("rgb(")
        || lower.starts_with("rgba(")
        || lower.starts_with("hsl(")
        || lower.starts_with("hsla(")
        || NAMED_COLORS.contains(&lower.as_str())
}

fn relative_luminance(rgb: Rgb) -> f64 {
    let lin: LinSrgb<f64> = rgb.into_format::<f64>().into_linear();
    0.2126 * lin.red + 0.7152 * lin.green + 0.0722 * lin.blue
}

/// WCAG contrast ratio between two colors (1.0 to 21.0).
pub fn contrast_ratio(foreground: &str, background: &str) -> Option<f64> {
    let fg = relative_luminance(parse_rgba(foreground)?.rgb);
    let bg = relative_luminance(parse_rgba(background)?.rgb);
    let (hi, lo) = if fg > bg { (fg, bg) } else { (bg, fg) };
    Some((hi + 0.05) / (lo + 0.05))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_rgb_accepts_only_six_digit_hex() {
        assert_eq!(hex_to_rgb("#00BCD4"), Some(Srgb::new(0, 188, 212)));
        assert_eq!(hex_to_rgb("#00bcd4"), Some(Srgb::new(0, 188, 212)));
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("white"), None);
        assert_eq!(hex_to_rgb("00BCD4"), None);
        assert_eq!(hex_to_rgb("#00BCZ4"), None);
    }

    #[test]
    fn distance_uses_sentinel_for_unparsable_colors() {
        assert_eq!(color_distance("white", "white"), 0.0);
        assert!((color_distance("white", "#FFFFFF") - UNPARSABLE_COLOR_DISTANCE).abs() < 1e-9);
        assert!((UNPARSABLE_COLOR_DISTANCE - 255.0 * 3f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn near_black_colors_depend_on_tolerance() {
        let d = color_distance("#000000", "#0A0A0A");
        assert!((d - 17.320508).abs() < 1e-4, "distance was {d}");
        assert!(!colors_equal("#000000", "#0A0A0A", 10.0));
        assert!(colors_equal("#000000", "#0A0A0A", 20.0));
    }

    #[test]
    fn colors_equal_is_symmetric() {
        let samples = ["#000000", "#0A0A0A", "#FF0000", "red", "#fff", "rgba(0,0,0,0.5)"];
        for a in samples {
            for b in samples {
                for t in [0.0, 10.0, 500.0] {
                    assert_eq!(colors_equal(a, b, t), colors_equal(b, a, t), "{a} vs {b} @ {t}");
                }
            }
        }
    }

    #[test]
    fn parse_rgba_reads_functional_notation() {
        let c = parse_rgba("rgba(0, 188, 212, 0.04)").expect("rgba parses");
        assert_eq!(c.rgb, Srgb::new(0, 188, 212));
        assert!((c.alpha - 0.04).abs() < 1e-9);

        let c = parse_rgba("rgb(255 255 255)").expect("space separated rgb parses");
        assert_eq!(c.alpha, 1.0);
        assert_eq!(parse_rgba("#0f0").map(|c| c.rgb), Some(Srgb::new(0, 255, 0)));
        assert!(parse_rgba("rgba(0, 188, 212").is_none());
    }

    #[test]
    fn normalize_color_canonicalizes_opaque_colors() {
        assert_eq!(normalize_color(" #00bcd4 "), "#00BCD4");
        assert_eq!(normalize_color("rgb(0, 188, 212)"), "#00BCD4");
        assert_eq!(normalize_color("#fff"), "#FFFFFF");
        assert_eq!(normalize_color("rgba(0, 0, 0, 0.5)"), "rgba(0, 0, 0, 0.5)");
        assert_eq!(normalize_color("white"), "white");
    }

    #[test]
    fn normalize_color_gives_translucent_colors_one_spelling() {
        let canonical = "rgba(0, 0, 0, 0.5)";
        assert_eq!(normalize_color("rgba(0,0,0,0.5)"), canonical);
        assert_eq!(normalize_color("RGBA(0 0 0 / 50%)"), canonical);
        assert_eq!(normalize_color("#00000080"), canonical);
        assert_eq!(normalize_color("rgba(0, 188, 212, 0.040)"), "rgba(0, 188, 212, 0.04)");
        assert_eq!(normalize_color("rgba(0, 188, 212, 1)"), "#00BCD4");
    }

    #[test]
    fn contrast_ratio_black_on_white_is_maximal() {
        let ratio = contrast_ratio("#000000", "#FFFFFF").expect("both parse");
        assert!((ratio - 21.0).abs() < 0.01, "ratio was {ratio}");
        let same = contrast_ratio("#777777", "#777777").expect("both parse");
        assert!((same - 1.0).abs() < 1e-9);
        assert!(contrast_ratio("white", "#000000").is_none());
    }
}
