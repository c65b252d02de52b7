//! Design export records.
//!
//! Accepts both a compact hand-written shape (`fill`, `stroke`, `padding`,
//! `fontSize` on the node) and the field names of the Figma REST API
//! (`fills`, `strokes`, `strokeWeight`, `paddingLeft`, `itemSpacing`,
//! `style.fontSize`, ...).

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::primitives::{rgba_to_css, Rgb, Rgba};

/// A number or a string, as design exports are not consistent about either.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DesignScalar {
    Number(f64),
    Text(String),
}

/// One node of the design tree.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignNode {
    #[serde(default, alias = "identifier")]
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<DesignNode>,

    #[serde(default, alias = "text", alias = "content")]
    pub characters: Option<String>,

    pub fill: Option<String>,
    #[serde(default)]
    pub fills: Vec<DesignPaint>,
    pub background_color: Option<String>,

    pub stroke: Option<DesignStroke>,
    #[serde(default)]
    pub strokes: Vec<DesignPaint>,
    pub stroke_weight: Option<f64>,

    pub padding: Option<DesignScalar>,
    pub padding_top: Option<f64>,
    pub padding_right: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub padding_left: Option<f64>,
    #[serde(alias = "itemSpacing")]
    pub gap: Option<f64>,
    #[serde(alias = "borderRadius")]
    pub corner_radius: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub absolute_bounding_box: Option<DesignBoundingBox>,

    #[serde(alias = "layoutDirection")]
    pub layout_mode: Option<String>,
    #[serde(alias = "mainAxisAlignment")]
    pub primary_axis_align_items: Option<String>,
    #[serde(alias = "crossAxisAlignment")]
    pub counter_axis_align_items: Option<String>,

    pub font_size: Option<f64>,
    pub font_weight: Option<DesignScalar>,
    pub style: Option<DesignTypeStyle>,

    pub visible: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignStroke {
    #[serde(alias = "color")]
    pub fill: Option<String>,
    #[serde(alias = "weight", alias = "width")]
    pub thickness: Option<f64>,
    pub opacity: Option<f64>,
}

/// Paint entry from the Figma API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignPaint {
    #[serde(rename = "type", default = "solid_paint")]
    pub paint_type: String,
    pub color: Option<DesignColor>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
}

fn solid_paint() -> String {
    "SOLID".to_string()
}

/// RGBA color from the Figma API (0.0-1.0 channels).
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct DesignColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl DesignColor {
    pub fn to_rgb(&self) -> Rgb {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Srgb::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

impl DesignPaint {
    pub fn is_visible_solid(&self) -> bool {
        self.visible.unwrap_or(true) && self.paint_type.eq_ignore_ascii_case("solid")
    }

    /// Effective alpha: color alpha times paint opacity.
    pub fn alpha(&self) -> f64 {
        self.color.map(|c| c.a).unwrap_or(1.0) * self.opacity.unwrap_or(1.0)
    }

    /// CSS spelling: hex when opaque, `rgba()` otherwise.
    pub fn to_css(&self) -> Option<String> {
        let color = self.color?;
        Some(rgba_to_css(Rgba {
            rgb: color.to_rgb(),
            alpha: self.alpha().clamp(0.0, 1.0),
        }))
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct DesignBoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Typography block from the Figma API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignTypeStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<f64>,
    pub line_height_px: Option<f64>,
}

impl DesignNode {
    /// First visible solid fill, in CSS spelling.
    pub fn fill_color(&self) -> Option<String> {
        self.fill.clone().or_else(|| {
            self.fills
                .iter()
                .find(|p| p.is_visible_solid())
                .and_then(DesignPaint::to_css)
        })
    }

    /// Stroke color, explicit opacity (if any) and thickness.
    pub fn stroke_paint(&self) -> Option<(String, Option<f64>, Option<f64>)> {
        if let Some(stroke) = &self.stroke {
            let color = stroke.fill.clone()?;
            return Some((color, stroke.opacity, stroke.thickness.or(self.stroke_weight)));
        }
        let paint = self.strokes.iter().find(|p| p.is_visible_solid())?;
        Some((paint.to_css()?, Some(paint.alpha()), self.stroke_weight))
    }

    pub fn effective_font_size(&self) -> Option<f64> {
        self.font_size
            .or_else(|| self.style.as_ref().and_then(|s| s.font_size))
    }

    pub fn effective_font_weight(&self) -> Option<DesignScalar> {
        self.font_weight.clone().or_else(|| {
            self.style
                .as_ref()
                .and_then(|s| s.font_weight)
                .map(DesignScalar::Number)
        })
    }

    pub fn effective_width(&self) -> Option<f64> {
        self.width
            .or_else(|| self.absolute_bounding_box.map(|b| b.width))
    }

    pub fn effective_height(&self) -> Option<f64> {
        self.height
            .or_else(|| self.absolute_bounding_box.map(|b| b.height))
    }

    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }
}
