//! Class-name references in `className` expressions.
//!
//! Handles `styles.title`, `styles['title-text']`, template literals,
//! ternaries, `&&`/`||`/`??`/`+` combinations, helper calls such as
//! `clsx(...)`, arrays and plain class strings.

use tree_sitter::Node;

use super::syntax::{node_text, string_literal, template_literal_text};

/// Collect class names referenced by `node`, in source order, without
/// duplicates.
pub fn collect_class_refs(node: Node<'_>, source: &str, style_idents: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    walk(node, source, style_idents, &mut out);
    let mut seen = std::collections::BTreeSet::new();
    out.retain(|c| seen.insert(c.clone()));
    out
}

fn walk(node: Node<'_>, source: &str, style_idents: &[String], out: &mut Vec<String>) {
    match node.kind() {
        "string" => push_tokens(string_literal(node, source), out),
        "template_string" => {
            let mut cursor = node.walk();
            for part in node.named_children(&mut cursor) {
                match part.kind() {
                    "string_fragment" => push_tokens(node_text(part, source), out),
                    "template_substitution" => walk(part, source, style_idents, out),
                    _ => {}
                }
            }
        }
        "member_expression" => {
            if is_style_module(node.child_by_field_name("object"), source, style_idents) {
                if let Some(prop) = node.child_by_field_name("property") {
                    out.push(node_text(prop, source).to_string());
                }
            }
        }
        "subscript_expression" => {
            if is_style_module(node.child_by_field_name("object"), source, style_idents) {
                if let Some(index) = node.child_by_field_name("index") {
                    match index.kind() {
                        "string" => out.push(string_literal(index, source).to_string()),
                        "template_string" => {
                            out.push(template_literal_text(index, source).trim().to_string())
                        }
                        _ => {}
                    }
                }
            }
        }
        "ternary_expression" => {
            for field in ["consequence", "alternative"] {
                if let Some(branch) = node.child_by_field_name(field) {
                    walk(branch, source, style_idents, out);
                }
            }
        }
        "binary_expression" => {
            let operator = node
                .child_by_field_name("operator")
                .map(|op| node_text(op, source))
                .unwrap_or_default();
            let sides: &[&str] = match operator {
                "&&" => &["right"],
                "||" | "??" | "+" => &["left", "right"],
                _ => &[],
            };
            for side in sides {
                if let Some(operand) = node.child_by_field_name(side) {
                    walk(operand, source, style_idents, out);
                }
            }
        }
        "call_expression" => {
            if let Some(args) = node.child_by_field_name("arguments") {
                walk(args, source, style_idents, out);
            }
        }
        "jsx_expression"
        | "parenthesized_expression"
        | "template_substitution"
        | "arguments"
        | "array" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                walk(child, source, style_idents, out);
            }
        }
        _ => {}
    }
}

fn is_style_module(object: Option<Node<'_>>, source: &str, style_idents: &[String]) -> bool {
    object
        .filter(|o| o.kind() == "identifier")
        .map(|o| {
            let name = node_text(o, source);
            style_idents.iter().any(|i| i == name)
        })
        .unwrap_or(false)
}

fn push_tokens(text: &str, out: &mut Vec<String>) {
    out.extend(text.split_whitespace().map(str::to_string));
}
