//! Design-tree normalization.
//!
//! This module provides:
//! - [`DesignNode`] - design export records (simplified shape or Figma REST fields)
//! - [`DesignNormalizer`] - reduction to the canonical element tree
//! - [`should_suppress_stroke`] - invisible-border detection
//! - [`load_design`] - reading an export from a JSON or YAML file

pub mod api_types;
pub mod conversion;
pub mod strokes;

#[cfg(test)]
mod tests;

pub use api_types::{
    DesignBoundingBox, DesignColor, DesignNode, DesignPaint, DesignScalar, DesignStroke,
    DesignTypeStyle,
};
pub use conversion::{design_segment_name, map_node_kind, DesignNormalizer};
pub use strokes::{should_suppress_stroke, StrokeCandidate};

use std::path::Path;

use serde::Deserialize;

use crate::{Result, SpcError};

/// A bare node, or a Figma-style `{ "document": node }` wrapper.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DesignDocument {
    Wrapped { document: DesignNode },
    Node(DesignNode),
}

impl DesignDocument {
    fn into_root(self) -> DesignNode {
        match self {
            DesignDocument::Wrapped { document } => document,
            DesignDocument::Node(node) => node,
        }
    }
}

pub fn parse_design_json(text: &str) -> Result<DesignNode> {
    let doc: DesignDocument = serde_json::from_str(text)?;
    Ok(doc.into_root())
}

pub fn parse_design_yaml(text: &str) -> Result<DesignNode> {
    let doc: DesignDocument = serde_yaml::from_str(text)?;
    Ok(doc.into_root())
}

/// Read a design export; `.yaml`/`.yml` files are parsed as YAML, anything
/// else as JSON.
pub fn load_design(path: &Path) -> Result<DesignNode> {
    if !path.exists() {
        return Err(SpcError::Config(format!(
            "File not found: {}",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);
    if is_yaml {
        parse_design_yaml(&text)
    } else {
        parse_design_json(&text)
    }
}
