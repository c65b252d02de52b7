//! Implementation-tree normalization: TSX markup plus its stylesheet reduced
//! to canonical elements.
//!
//! - [`ImplementationNormalizer`] - loads the grammar once, then normalizes files
//! - [`syntax`] - parsing and render-root discovery
//! - [`class_refs`] - class references inside `className` expressions
//! - [`inline_style`] - `style={{...}}` objects
//! - [`tags`] - tag → kind table

pub mod class_refs;
pub mod inline_style;
pub mod syntax;
pub mod tags;


pub use class_refs::collect_class_refs;
pub use inline_style::parse_inline_style;
pub use tags::{layout_from_style, map_tag_kind};

use std::collections::BTreeMap;

use tracing::{debug, warn};
use tree_sitter::{Language, Node};

use crate::config::Config;
use crate::naming::{capitalize, join_path, NameResolver};
use crate::stylesheet::{reduce_stylesheet, Stylesheet};
use crate::types::{collapse_whitespace, CanonicalElement, ElementKind, Origin, StyleMap};
use crate::Result;

use syntax::{
    collect_render_roots, first_expression, is_fragment, is_jsx, new_parser, node_text,
    parse_source, string_literal, style_module_identifiers, template_literal_text, unwrap_parens,
};

const CLASS_ATTRIBUTES: &[&str] = &["className", "class"];

/// Reduces (markup, stylesheet) pairs to canonical forests.
///
/// Holds only the loaded grammar and injected name tables, so one instance
/// can serve concurrent callers; a parser is created per call.
#[derive(Debug, Clone)]
pub struct ImplementationNormalizer {
    language: Language,
    resolver: NameResolver,
    /// Design name → implementation component name.
    opaque_components: BTreeMap<String, String>,
    root_font_size: f64,
}

struct WalkContext<'a> {
    source: &'a str,
    stylesheet: &'a Stylesheet,
    style_idents: &'a [String],
}

impl ImplementationNormalizer {
    /// Load the TSX grammar. Fails only if the grammar is incompatible with
    /// the linked tree-sitter runtime.
    pub fn new(
        resolver: NameResolver,
        opaque_components: BTreeMap<String, String>,
        root_font_size: f64,
    ) -> Result<Self> {
        let language = syntax::tsx_language();
        new_parser(&language)?;
        Ok(Self {
            language,
            resolver,
            opaque_components,
            root_font_size,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.name_resolver(),
            config.opaque_components.clone(),
            config.units.root_font_size,
        )
    }

    /// Normalize one unit. A syntax error anywhere in the markup yields
    /// `Err(SpcError::MarkupParse)`: the unit must be treated as skipped,
    /// not as having no elements.
    pub fn normalize(&self, markup: &str, css: &str) -> Result<Vec<CanonicalElement>> {
        let stylesheet = reduce_stylesheet(css, self.root_font_size);
        self.normalize_with_stylesheet(markup, &stylesheet)
    }

    pub fn normalize_with_stylesheet(
        &self,
        markup: &str,
        stylesheet: &Stylesheet,
    ) -> Result<Vec<CanonicalElement>> {
        let tree = parse_source(&self.language, markup).inspect_err(|e| {
            warn!(error = %e, "markup failed to parse; unit skipped");
        })?;
        let root = tree.root_node();
        let style_idents = style_module_identifiers(root, markup);
        let ctx = WalkContext {
            source: markup,
            stylesheet,
            style_idents: &style_idents,
        };

        let top_level: Vec<Node<'_>> = collect_render_roots(root)
            .into_iter()
            .flat_map(|node| {
                if is_fragment(node) {
                    element_children(node)
                } else {
                    vec![node]
                }
            })
            .collect();

        let elements: Vec<CanonicalElement> = top_level
            .into_iter()
            .enumerate()
            .map(|(idx, node)| self.build_element(&ctx, node, None, idx))
            .collect();

        debug!(
            roots = elements.len(),
            classes = stylesheet.len(),
            style_modules = ?style_idents,
            "normalized implementation markup"
        );
        Ok(elements)
    }

    fn build_element(
        &self,
        ctx: &WalkContext<'_>,
        node: Node<'_>,
        parent_path: Option<&str>,
        sibling_index: usize,
    ) -> CanonicalElement {
        let opening = opening_element(node);
        let tag = opening
            .and_then(|o| o.child_by_field_name("name"))
            .map(|n| node_text(n, ctx.source))
            .unwrap_or_default();
        let attrs = opening
            .map(|o| attributes(o, ctx.source))
            .unwrap_or_default();

        let mut classes = Vec::new();
        for (name, value) in &attrs {
            if CLASS_ATTRIBUTES.contains(&name.as_str()) {
                if let Some(value) = value {
                    classes.extend(collect_class_refs(*value, ctx.source, ctx.style_idents));
                }
            }
        }

        let kind = map_tag_kind(tag);
        let opaque = self.opaque_match(tag);
        let name = match &opaque {
            Some((design_name, _)) => design_name.clone(),
            None => {
                let raw = classes.first().map(String::as_str).unwrap_or(tag);
                self.resolver.reverse_alias(raw).unwrap_or(raw).to_string()
            }
        };
        let name = match parent_path {
            Some(_) => name,
            None => capitalize(&name),
        };
        let path = join_path(parent_path, &name, sibling_index);

        let mut element = CanonicalElement::new(Origin::Implementation, kind, name, path);
        element.style = self.resolve_style(ctx, &classes, &attrs);
        element.layout = layout_from_style(&element.style);
        element.text_content = element_text(node, ctx.source, kind == ElementKind::Text);

        if let Some((_, counterpart)) = opaque {
            debug!(path = %element.path, tag, "opaque implementation component");
            return element.into_opaque(counterpart);
        }

        let children = element_children(node)
            .into_iter()
            .enumerate()
            .map(|(idx, child)| self.build_element(ctx, child, Some(&element.path), idx))
            .collect();
        element.with_children(children)
    }

    /// Class styles in reference order, then inline styles on top.
    fn resolve_style(
        &self,
        ctx: &WalkContext<'_>,
        classes: &[String],
        attrs: &[(String, Option<Node<'_>>)],
    ) -> StyleMap {
        let mut style = StyleMap::new();
        for class in classes {
            match ctx.stylesheet.class(class) {
                Some(declared) => style.extend(declared.clone()),
                None => debug!(class = %class, "class not found in stylesheet"),
            }
        }
        for (name, value) in attrs {
            if name == "style" {
                if let Some(value) = value {
                    style.extend(parse_inline_style(*value, ctx.source, self.root_font_size));
                }
            }
        }
        style
    }

    /// `(design name, implementation name)` when `tag` is a registered
    /// opaque component under either name.
    fn opaque_match(&self, tag: &str) -> Option<(String, String)> {
        if tag.is_empty() {
            return None;
        }
        self.opaque_components
            .iter()
            .find(|(design, implementation)| implementation.as_str() == tag || design.as_str() == tag)
            .map(|(design, implementation)| (design.clone(), implementation.clone()))
    }
}

fn opening_element(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        "jsx_self_closing_element" => Some(node),
        "jsx_element" => node.child_by_field_name("open_tag"),
        _ => None,
    }
}

/// `(name, value)` for every attribute on an opening element. Boolean
/// attributes have no value.
fn attributes<'t>(opening: Node<'t>, source: &str) -> Vec<(String, Option<Node<'t>>)> {
    let mut cursor = opening.walk();
    let attrs: Vec<Node<'t>> = opening
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "jsx_attribute")
        .collect();
    attrs
        .into_iter()
        .filter_map(|attr| {
            let mut attr_cursor = attr.walk();
            let parts: Vec<Node<'t>> = attr.named_children(&mut attr_cursor).collect();
            let name = parts.first()?;
            Some((node_text(*name, source).to_string(), parts.get(1).copied()))
        })
        .collect()
}

/// Element children in render order. Fragments are flattened; elements in
/// `cond && <X/>` and `cond ? <A/> : <B/>` are included; elements inside
/// call expressions are not.
fn element_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    if node.kind() == "jsx_self_closing_element" {
        return out;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
    for child in children {
        match child.kind() {
            "jsx_opening_element" | "jsx_closing_element" | "jsx_text" => {}
            "jsx_expression" => collect_conditional_elements(child, &mut out),
            _ if is_jsx(child) => push_element(child, &mut out),
            _ => {}
        }
    }
    out
}

fn push_element<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    if is_fragment(node) {
        out.extend(element_children(node));
    } else {
        out.push(node);
    }
}

fn collect_conditional_elements<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    match node.kind() {
        _ if is_jsx(node) => push_element(node, out),
        "jsx_expression" | "parenthesized_expression" => {
            let mut cursor = node.walk();
            let inner: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
            for child in inner {
                collect_conditional_elements(child, out);
            }
        }
        "ternary_expression" => {
            for field in ["consequence", "alternative"] {
                if let Some(branch) = node.child_by_field_name(field) {
                    collect_conditional_elements(branch, out);
                }
            }
        }
        "binary_expression" => {
            if let Some(right) = node.child_by_field_name("right") {
                collect_conditional_elements(right, out);
            }
        }
        _ => {}
    }
}

/// Direct text of an element: JSX text plus string and template
/// interpolations. With `deep`, text of descendant elements is included.
fn element_text(node: Node<'_>, source: &str, deep: bool) -> Option<String> {
    let mut parts = Vec::new();
    collect_text(node, source, deep, &mut parts);
    collapse_whitespace(&parts.join(" "))
}

fn collect_text(node: Node<'_>, source: &str, deep: bool, parts: &mut Vec<String>) {
    if node.kind() == "jsx_self_closing_element" {
        return;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
    for child in children {
        match child.kind() {
            "jsx_text" => parts.push(node_text(child, source).to_string()),
            "jsx_expression" => {
                if let Some(expr) = first_expression(child).map(unwrap_parens) {
                    match expr.kind() {
                        "string" => parts.push(string_literal(expr, source).to_string()),
                        "template_string" => parts.push(template_literal_text(expr, source)),
                        _ => {}
                    }
                }
            }
            _ if is_fragment(child) => collect_text(child, source, deep, parts),
            _ if deep && is_jsx(child) => collect_text(child, source, deep, parts),
            _ => {}
        }
    }
}
