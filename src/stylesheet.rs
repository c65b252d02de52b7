//! Reduce CSS (module) stylesheets to per-class canonical property maps.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::primitives::color::looks_like_color;
use crate::primitives::coerce_property_value;
use crate::types::{StyleMap, StyleValue};

/// Class name → properties declared for it.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    classes: BTreeMap<String, StyleMap>,
}

impl Stylesheet {
    /// Properties for a class, trying the exact name first and then the
    /// kebab/camel spelling CSS-module loaders commonly expose.
    pub fn class(&self, name: &str) -> Option<&StyleMap> {
        self.classes
            .get(name)
            .or_else(|| self.classes.get(&to_kebab_case(name)))
            .or_else(|| self.classes.get(&to_camel_case(name)))
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

fn class_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\.(-?[A-Za-z_][A-Za-z0-9_-]*)\s*\{([^{}]*)\}").expect("class block regex")
    })
}

fn comment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("comment regex"))
}

/// Scan `.class { ... }` blocks. Repeated blocks for one class merge, later
/// declarations winning.
pub fn parse_stylesheet(css: &str, root_font_size: f64) -> Stylesheet {
    let mut classes: BTreeMap<String, StyleMap> = BTreeMap::new();
    for caps in class_block_regex().captures_iter(css) {
        let name = caps[1].to_string();
        let declarations = parse_declarations(&caps[2], root_font_size);
        classes.entry(name).or_default().extend(declarations);
    }
    Stylesheet { classes }
}

/// Strip comments, then scan class blocks.
pub fn reduce_stylesheet(css: &str, root_font_size: f64) -> Stylesheet {
    parse_stylesheet(&strip_comments(css), root_font_size)
}

/// Parse a `prop: value; prop: value` list into a style map.
pub fn parse_declarations(body: &str, root_font_size: f64) -> StyleMap {
    let mut style = StyleMap::new();
    for declaration in body.split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim().trim_end_matches("!important").trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }
        let (property, value) = canonical_declaration(&to_camel_case(name), value, root_font_size);
        style.insert(property, value);
    }
    style
}

/// Property/value pair in canonical form. A `background` holding a single
/// color is recorded as `backgroundColor`.
pub fn canonical_declaration(property: &str, raw: &str, root_font_size: f64) -> (String, StyleValue) {
    if property == "background" && looks_like_color(raw) && !raw.contains("gradient") {
        return (
            "backgroundColor".to_string(),
            coerce_property_value("backgroundColor", raw, root_font_size),
        );
    }
    (
        property.to_string(),
        coerce_property_value(property, raw, root_font_size),
    )
}

/// `background-color` → `backgroundColor`, `-webkit-box-shadow` → `WebkitBoxShadow`.
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for (i, c) in name.trim().chars().enumerate() {
        if c == '-' {
            upper_next = i == 0 || !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn strip_comments(css: &str) -> String {
    comment_regex().replace_all(css, "").into_owned()
}

/// Remove `@media` blocks, including their nested rules.
pub fn strip_media_queries(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("@media") {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        let Some(open) = after.find('{') else {
            rest = "";
            break;
        };
        let mut depth = 0usize;
        let mut end = after.len();
        for (i, c) in after[open..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        end = open + i + 1;
                        break;
                    }
                }
                _ => {}
            }
        }
        rest = &after[end..];
    }
    out.push_str(rest);
    out
}
