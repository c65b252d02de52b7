//! Design node tree → canonical element tree.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::{Config, StrokeOverride};
use crate::naming::{capitalize, join_path, normalize_text_name, strip_numeric_suffix};
use crate::primitives::{box_from_sides, canonical_box_value, normalize_color, parse_style_value};
use crate::types::{
    collapse_whitespace, Arrangement, CanonicalElement, ElementKind, LayoutAttributes, Origin,
    StyleMap, StyleValue,
};

use super::api_types::{DesignNode, DesignScalar};
use super::strokes::{should_suppress_stroke, StrokeCandidate};

/// Map a design node type to a canonical kind. Unknown types are containers.
pub fn map_node_kind(node_type: &str) -> ElementKind {
    match node_type.to_ascii_lowercase().as_str() {
        "text" => ElementKind::Text,
        "button" => ElementKind::Button,
        "image" => ElementKind::Image,
        "icon" | "vector" | "ellipse" | "boolean_operation" | "star" | "polygon" => {
            ElementKind::Icon
        }
        "input" | "textfield" | "text_field" => ElementKind::Input,
        _ => ElementKind::Container,
    }
}

/// Segment name a design node contributes to its path.
///
/// Trailing digits are stripped; text nodes additionally follow the
/// implementation's class-name convention.
pub fn design_segment_name(name: &str, kind: ElementKind) -> String {
    let stripped = strip_numeric_suffix(name.trim());
    if kind == ElementKind::Text {
        let normalized = normalize_text_name(stripped);
        if !normalized.is_empty() {
            return normalized;
        }
    }
    stripped.to_string()
}

/// Reduces design node trees using the opaque-component registry and stroke
/// override table from configuration.
#[derive(Debug, Clone, Default)]
pub struct DesignNormalizer {
    opaque_components: BTreeMap<String, String>,
    stroke_overrides: Vec<StrokeOverride>,
    root_font_size: f64,
}

impl DesignNormalizer {
    pub fn new(
        opaque_components: BTreeMap<String, String>,
        stroke_overrides: Vec<StrokeOverride>,
        root_font_size: f64,
    ) -> Self {
        Self {
            opaque_components,
            stroke_overrides,
            root_font_size,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.opaque_components.clone(),
            config.stroke_overrides.clone(),
            config.units.root_font_size,
        )
    }

    /// Normalize a top-level frame. The root's path is its bare name and it
    /// defaults to a vertical flex layout.
    pub fn normalize(&self, root: &DesignNode) -> CanonicalElement {
        let mut element = self.normalize_node(root, None, 0, None);
        if element.layout.is_none() {
            element.layout = Some(LayoutAttributes::vertical_flex());
        }
        debug!(
            root = %element.path,
            nodes = element.walk().len(),
            "normalized design tree"
        );
        element
    }

    /// Normalize one node below `parent_path` at `sibling_index`.
    /// `inherited_background` is the nearest ancestor background, used for
    /// stroke suppression.
    pub fn normalize_node(
        &self,
        node: &DesignNode,
        parent_path: Option<&str>,
        sibling_index: usize,
        inherited_background: Option<&str>,
    ) -> CanonicalElement {
        let kind = map_node_kind(&node.node_type);
        let name = match parent_path {
            Some(_) => design_segment_name(&node.name, kind),
            None => capitalize(strip_numeric_suffix(node.name.trim())),
        };
        let path = join_path(parent_path, &name, sibling_index);

        let mut element = CanonicalElement::new(Origin::Design, kind, name, path);
        element.text_content = node.characters.as_deref().and_then(collapse_whitespace);
        element.style = self.extract_style(node, kind, inherited_background);
        element.layout = map_layout(node);

        if let Some(counterpart) = self.opaque_components.get(&node.name) {
            debug!(path = %element.path, counterpart = %counterpart, "opaque design component");
            return element.into_opaque(counterpart.clone());
        }

        let background = match element.style.get("backgroundColor") {
            Some(StyleValue::Color(c)) => Some(c.clone()),
            _ => inherited_background.map(str::to_string),
        };

        let children = node
            .children
            .iter()
            .filter(|child| child.is_visible())
            .enumerate()
            .map(|(idx, child)| {
                self.normalize_node(child, Some(&element.path), idx, background.as_deref())
            })
            .collect();
        element.with_children(children)
    }

    fn extract_style(
        &self,
        node: &DesignNode,
        kind: ElementKind,
        inherited_background: Option<&str>,
    ) -> StyleMap {
        let mut style = StyleMap::new();

        if let Some(size) = node.effective_font_size() {
            style.insert("fontSize".into(), StyleValue::Number(size));
        }
        if let Some(weight) = node.effective_font_weight() {
            style.insert("fontWeight".into(), self.scalar_value(&weight));
        }

        let fill = node.fill_color().map(|c| normalize_color(&c));
        let background = node.background_color.as_deref().map(normalize_color);
        if kind == ElementKind::Text {
            if let Some(fill) = fill {
                style.insert("color".into(), StyleValue::Color(fill));
            }
        } else if let Some(bg) = fill.or(background) {
            style.insert("backgroundColor".into(), StyleValue::Color(bg));
        }

        if let Some(padding) = self.padding_value(node) {
            style.insert("padding".into(), padding);
        }
        if let Some(gap) = node.gap {
            style.insert("gap".into(), StyleValue::Number(gap));
        }
        if let Some(radius) = node.corner_radius {
            style.insert("borderRadius".into(), StyleValue::Number(radius));
        }
        if let Some(width) = node.effective_width() {
            style.insert("width".into(), StyleValue::Number(width));
        }
        if let Some(height) = node.effective_height() {
            style.insert("height".into(), StyleValue::Number(height));
        }

        if let Some((color, opacity, thickness)) = node.stroke_paint() {
            let own_background = style.get("backgroundColor").and_then(StyleValue::as_str);
            let background = own_background.or(inherited_background);
            let candidate = StrokeCandidate {
                node_name: &node.name,
                color: &color,
                opacity,
            };
            if should_suppress_stroke(&candidate, background, &self.stroke_overrides) {
                debug!(node = %node.name, stroke = %color, "suppressed invisible stroke");
            } else {
                style.insert("borderColor".into(), StyleValue::Color(normalize_color(&color)));
                if let Some(width) = thickness {
                    style.insert("borderWidth".into(), StyleValue::Number(width));
                }
            }
        }

        style
    }

    fn scalar_value(&self, scalar: &DesignScalar) -> StyleValue {
        match scalar {
            DesignScalar::Number(n) => StyleValue::Number(*n),
            DesignScalar::Text(s) => parse_style_value(s, self.root_font_size),
        }
    }

    fn padding_value(&self, node: &DesignNode) -> Option<StyleValue> {
        if let Some(padding) = &node.padding {
            return Some(match padding {
                DesignScalar::Number(n) => StyleValue::Number(*n),
                DesignScalar::Text(s) => canonical_box_value(s, self.root_font_size),
            });
        }
        let sides = [
            node.padding_top,
            node.padding_right,
            node.padding_bottom,
            node.padding_left,
        ];
        if sides.iter().all(Option::is_none) {
            return None;
        }
        let [top, right, bottom, left] = sides.map(|s| s.unwrap_or(0.0));
        Some(box_from_sides(top, right, bottom, left))
    }
}

fn map_layout(node: &DesignNode) -> Option<LayoutAttributes> {
    let mode = node.layout_mode.as_deref()?.to_ascii_lowercase();
    let (arrangement, direction) = match mode.as_str() {
        "horizontal" | "row" => (Arrangement::Flex, Some("row")),
        "vertical" | "column" => (Arrangement::Flex, Some("column")),
        "grid" => (Arrangement::Grid, None),
        "stack" => (Arrangement::Stack, None),
        "none" | "absolute" => (Arrangement::Absolute, None),
        _ => return None,
    };
    Some(LayoutAttributes {
        arrangement,
        direction: direction.map(str::to_string),
        main_axis_alignment: node.primary_axis_align_items.as_deref().map(map_alignment),
        cross_axis_alignment: node.counter_axis_align_items.as_deref().map(map_alignment),
    })
}

/// Figma alignment keywords to their CSS spelling.
fn map_alignment(value: &str) -> String {
    match value.to_ascii_uppercase().as_str() {
        "MIN" => "flex-start".to_string(),
        "MAX" => "flex-end".to_string(),
        "CENTER" => "center".to_string(),
        "SPACE_BETWEEN" => "space-between".to_string(),
        "BASELINE" => "baseline".to_string(),
        _ => value.to_ascii_lowercase(),
    }
}
