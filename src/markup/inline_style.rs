//! Inline `style={{ ... }}` object literals.

use tree_sitter::Node;

use crate::stylesheet::{canonical_declaration, to_camel_case};
use crate::types::{format_number, StyleMap};

use super::syntax::{first_expression, node_text, string_literal, template_literal_text, unwrap_parens};

/// Read an inline style object. Numeric values are pixels; string values go
/// through the same unit coercion as stylesheet declarations. Spreads,
/// computed keys and dynamic values are skipped.
pub fn parse_inline_style(value: Node<'_>, source: &str, root_font_size: f64) -> StyleMap {
    let mut style = StyleMap::new();
    let object = match value.kind() {
        "jsx_expression" => match first_expression(value) {
            Some(expr) => unwrap_parens(expr),
            None => return style,
        },
        _ => unwrap_parens(value),
    };
    if object.kind() != "object" {
        return style;
    }

    let mut cursor = object.walk();
    for pair in object
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "pair")
    {
        let (Some(key), Some(val)) = (
            pair.child_by_field_name("key"),
            pair.child_by_field_name("value"),
        ) else {
            continue;
        };
        let property = match key.kind() {
            "property_identifier" => node_text(key, source).to_string(),
            "string" => to_camel_case(string_literal(key, source)),
            _ => continue,
        };
        let Some(raw) = literal_value(unwrap_parens(val), source) else {
            continue;
        };
        let (property, value) = canonical_declaration(&property, &raw, root_font_size);
        style.insert(property, value);
    }
    style
}

fn literal_value(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "number" => numeric_literal(node_text(node, source)),
        "unary_expression" => {
            let operand = node.child_by_field_name("argument")?;
            let operator = node.child_by_field_name("operator").map(|o| node_text(o, source));
            if operand.kind() != "number" || operator != Some("-") {
                return None;
            }
            numeric_literal(node_text(operand, source)).map(|n| format!("-{n}"))
        }
        "string" => Some(string_literal(node, source).to_string()),
        "template_string" => {
            let mut cursor = node.walk();
            let dynamic = node
                .named_children(&mut cursor)
                .any(|c| c.kind() == "template_substitution");
            if dynamic {
                None
            } else {
                Some(template_literal_text(node, source))
            }
        }
        _ => None,
    }
}

fn numeric_literal(text: &str) -> Option<String> {
    text.parse::<f64>().ok().map(format_number)
}
