//! Canonical element tree shared by the design and implementation sides.
//!
//! Both normalizers reduce their input to [`CanonicalElement`] trees; the
//! comparator never looks at design records or syntax trees directly.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Closed set of element kinds understood by the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Container,
    Button,
    Image,
    Icon,
    Input,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Container => "container",
            ElementKind::Button => "button",
            ElementKind::Image => "image",
            ElementKind::Icon => "icon",
            ElementKind::Input => "input",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A style value, normalized at the parsing boundary.
///
/// `Number` holds pixels (or a unitless quantity such as a font weight).
/// `Dimension` keeps units that are not converted to pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Number(f64),
    Dimension { value: f64, unit: String },
    Text(String),
    Color(String),
}

impl StyleValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String form for the string-like variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) | StyleValue::Color(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(n) => write!(f, "{}", format_number(*n)),
            StyleValue::Dimension { value, unit } => write!(f, "{}{}", format_number(*value), unit),
            StyleValue::Text(s) | StyleValue::Color(s) => f.write_str(s),
        }
    }
}

impl Serialize for StyleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StyleValue::Number(n) => serializer.serialize_f64(*n),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

/// Renders `16.0` as `16` and `1.5` as `1.5`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Trim and collapse internal whitespace runs to single spaces. Blank input
/// yields `None`.
pub fn collapse_whitespace(text: &str) -> Option<String> {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

pub type StyleMap = BTreeMap<String, StyleValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrangement {
    Flex,
    Grid,
    Stack,
    Absolute,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutAttributes {
    pub arrangement: Arrangement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_axis_alignment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_axis_alignment: Option<String>,
}

impl LayoutAttributes {
    pub fn vertical_flex() -> Self {
        Self {
            arrangement: Arrangement::Flex,
            direction: Some("column".to_string()),
            main_axis_alignment: None,
            cross_axis_alignment: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Design,
    Implementation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub origin: Origin,
    pub is_opaque_component: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opaque_counterpart_name: Option<String>,
}

/// One node of a canonical tree.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalElement {
    pub id: Uuid,
    pub kind: ElementKind,
    /// Segment name this node contributes to its path.
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(skip_serializing_if = "StyleMap::is_empty")]
    pub style: StyleMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CanonicalElement>>,
    pub provenance: Provenance,
}

impl CanonicalElement {
    pub fn new(origin: Origin, kind: ElementKind, name: String, path: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name,
            path,
            text_content: None,
            style: StyleMap::new(),
            layout: None,
            children: None,
            provenance: Provenance {
                origin,
                is_opaque_component: false,
                opaque_counterpart_name: None,
            },
        }
    }

    /// Marks the element opaque and drops any children.
    pub fn into_opaque(mut self, counterpart: impl Into<String>) -> Self {
        self.children = None;
        self.provenance.is_opaque_component = true;
        self.provenance.opaque_counterpart_name = Some(counterpart.into());
        self
    }

    /// Attaches children; empty lists are stored as `None`. Opaque elements
    /// never receive children.
    pub fn with_children(mut self, children: Vec<CanonicalElement>) -> Self {
        if self.provenance.is_opaque_component || children.is_empty() {
            self.children = None;
        } else {
            self.children = Some(children);
        }
        self
    }

    pub fn children(&self) -> &[CanonicalElement] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_opaque(&self) -> bool {
        self.provenance.is_opaque_component
    }

    /// Copy without the subtree, used when recording comparison entries.
    pub fn shallow(&self) -> CanonicalElement {
        CanonicalElement {
            children: None,
            ..self.clone()
        }
    }

    /// Trimmed, lower-cased text used as the content-fallback key.
    pub fn content_key(&self) -> Option<String> {
        self.text_content
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    /// Pre-order walk over this node and every descendant.
    pub fn walk(&self) -> Vec<&CanonicalElement> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            for child in node.children().iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}
