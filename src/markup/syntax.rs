//! TSX syntax-tree plumbing: parsing, error detection and render-root discovery.

use tree_sitter::{Language, Node, Parser, Tree};

use crate::{Result, SpcError};

const JSX_KINDS: &[&str] = &["jsx_element", "jsx_self_closing_element", "jsx_fragment"];

const FUNCTION_KINDS: &[&str] = &[
    "arrow_function",
    "function",
    "function_expression",
    "function_declaration",
    "generator_function",
    "generator_function_declaration",
    "method_definition",
];

const STYLE_EXTENSIONS: &[&str] = &[".css", ".scss", ".sass", ".less"];

/// Identifier the style module is assumed to be imported as when no
/// stylesheet import is found.
pub const DEFAULT_STYLE_IDENTIFIER: &str = "styles";

pub fn tsx_language() -> Language {
    tree_sitter_typescript::LANGUAGE_TSX.into()
}

pub fn new_parser(language: &Language) -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(language)
        .map_err(|e| SpcError::Grammar(e.to_string()))?;
    Ok(parser)
}

/// Parse `source`, failing on any error or missing node.
pub fn parse_source(language: &Language, source: &str) -> Result<Tree> {
    let mut parser = new_parser(language)?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| SpcError::markup_parse("parser produced no tree"))?;
    if let Some(bad) = first_syntax_error(tree.root_node()) {
        let pos = bad.start_position();
        return Err(SpcError::markup_parse(format!(
            "syntax error at line {}, column {}",
            pos.row + 1,
            pos.column + 1
        )));
    }
    Ok(tree)
}

/// Deepest-first search for the first error or missing node.
pub fn first_syntax_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .find_map(first_syntax_error)
        .or(Some(node))
}

pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

/// Contents of a string literal without its quotes.
pub fn string_literal<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    let text = node_text(node, source);
    text.strip_prefix(['"', '\''])
        .and_then(|t| t.strip_suffix(['"', '\'']))
        .unwrap_or(text)
}

/// Literal text of a template string, ignoring `${...}` substitutions.
pub fn template_literal_text(node: Node<'_>, source: &str) -> String {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() == "string_fragment")
        .map(|c| node_text(c, source))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn is_jsx(node: Node<'_>) -> bool {
    JSX_KINDS.contains(&node.kind())
}

/// `<>...</>`, whichever way the grammar spells it.
pub fn is_fragment(node: Node<'_>) -> bool {
    match node.kind() {
        "jsx_fragment" => true,
        "jsx_element" => node
            .child_by_field_name("open_tag")
            .map(|open| open.child_by_field_name("name").is_none())
            .unwrap_or(false),
        _ => false,
    }
}

pub fn unwrap_parens(mut node: Node<'_>) -> Node<'_> {
    while node.kind() == "parenthesized_expression" {
        match first_expression(node) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// First named child that is not a comment.
pub fn first_expression(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() != "comment");
    found
}

/// A function passed as a call argument (`useMemo(() => ...)`,
/// `items.map(item => ...)`) or as a JSX attribute value.
fn is_callback_function(node: Node<'_>) -> bool {
    FUNCTION_KINDS.contains(&node.kind())
        && node
            .parent()
            .map(|p| matches!(p.kind(), "arguments" | "jsx_expression"))
            .unwrap_or(false)
}

/// Arrow function bound directly to a name or exported.
fn is_bound_arrow(node: Node<'_>) -> bool {
    node.parent()
        .map(|p| matches!(p.kind(), "variable_declarator" | "export_statement"))
        .unwrap_or(false)
}

/// JSX nodes that are rendered as a component's output: direct operands of
/// `return`, and expression bodies of bound arrow functions. Anything inside
/// a callback function is excluded.
pub fn collect_render_roots(root: Node<'_>) -> Vec<Node<'_>> {
    let mut roots = Vec::new();
    visit_for_roots(root, false, &mut roots);
    roots
}

fn visit_for_roots<'t>(node: Node<'t>, in_callback: bool, roots: &mut Vec<Node<'t>>) {
    let in_callback = in_callback || is_callback_function(node);
    match node.kind() {
        "return_statement" if !in_callback => {
            if let Some(expr) = first_expression(node).map(unwrap_parens) {
                if is_jsx(expr) {
                    roots.push(expr);
                    return;
                }
            }
        }
        "arrow_function" if !in_callback && is_bound_arrow(node) => {
            if let Some(body) = node.child_by_field_name("body").map(unwrap_parens) {
                if is_jsx(body) {
                    roots.push(body);
                    return;
                }
            }
        }
        kind if JSX_KINDS.contains(&kind) => return,
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        visit_for_roots(child, in_callback, roots);
    }
}

/// Local names bound by stylesheet imports (`import styles from
/// './Login.module.css'`, `import * as css from './x.scss'`). Falls back to
/// [`DEFAULT_STYLE_IDENTIFIER`].
pub fn style_module_identifiers(root: Node<'_>, source: &str) -> Vec<String> {
    let mut idents = Vec::new();
    let mut cursor = root.walk();
    for import in root
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "import_statement")
    {
        let Some(from) = import.child_by_field_name("source") else {
            continue;
        };
        let module = string_literal(from, source);
        let module = module.split('?').next().unwrap_or(module);
        if !STYLE_EXTENSIONS.iter().any(|ext| module.ends_with(ext)) {
            continue;
        }
        let mut import_cursor = import.walk();
        for clause in import
            .named_children(&mut import_cursor)
            .filter(|n| n.kind() == "import_clause")
        {
            let mut clause_cursor = clause.walk();
            for binding in clause.named_children(&mut clause_cursor) {
                match binding.kind() {
                    "identifier" => idents.push(node_text(binding, source).to_string()),
                    "namespace_import" => {
                        if let Some(name) = first_expression(binding) {
                            idents.push(node_text(name, source).to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
    }
    if idents.is_empty() {
        idents.push(DEFAULT_STYLE_IDENTIFIER.to_string());
    }
    idents
}
