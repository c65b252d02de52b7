//! Tag → kind table and layout inference from resolved styles.

use crate::types::{Arrangement, ElementKind, LayoutAttributes, StyleMap, StyleValue};

/// Map a JSX tag to a canonical kind. Matching is case-insensitive so
/// component tags such as `Button` or `Image` map like their HTML
/// counterparts. Unmapped tags are containers.
pub fn map_tag_kind(tag: &str) -> ElementKind {
    match tag.to_ascii_lowercase().as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" | "span" | "a" | "em" | "strong"
        | "label" | "small" | "b" | "i" | "text" => ElementKind::Text,
        "button" => ElementKind::Button,
        "input" | "textarea" | "select" | "textinput" => ElementKind::Input,
        "img" | "image" | "picture" => ElementKind::Image,
        "svg" | "path" | "icon" => ElementKind::Icon,
        _ => ElementKind::Container,
    }
}

fn text_value<'a>(style: &'a StyleMap, property: &str) -> Option<&'a str> {
    style.get(property).and_then(StyleValue::as_str)
}

/// Layout implied by `display`, `flexDirection`, `justifyContent`,
/// `alignItems` and `position`.
pub fn layout_from_style(style: &StyleMap) -> Option<LayoutAttributes> {
    let display = text_value(style, "display").map(str::to_ascii_lowercase);
    let arrangement = match display.as_deref() {
        Some("flex") | Some("inline-flex") => Arrangement::Flex,
        Some("grid") | Some("inline-grid") => Arrangement::Grid,
        _ if text_value(style, "position").is_some_and(|p| p.eq_ignore_ascii_case("absolute")) => {
            Arrangement::Absolute
        }
        _ => return None,
    };
    let direction = match arrangement {
        Arrangement::Flex => Some(
            text_value(style, "flexDirection")
                .unwrap_or("row")
                .to_ascii_lowercase(),
        ),
        _ => None,
    };
    Some(LayoutAttributes {
        arrangement,
        direction,
        main_axis_alignment: text_value(style, "justifyContent").map(str::to_string),
        cross_axis_alignment: text_value(style, "alignItems").map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_map_case_insensitively() {
        assert_eq!(map_tag_kind("h2"), ElementKind::Text);
        assert_eq!(map_tag_kind("Button"), ElementKind::Button);
        assert_eq!(map_tag_kind("textarea"), ElementKind::Input);
        assert_eq!(map_tag_kind("img"), ElementKind::Image);
        assert_eq!(map_tag_kind("svg"), ElementKind::Icon);
        assert_eq!(map_tag_kind("section"), ElementKind::Container);
        assert_eq!(map_tag_kind("ProfileCard"), ElementKind::Container);
    }

    #[test]
    fn flex_layout_defaults_to_row() {
        let mut style = StyleMap::new();
        style.insert("display".into(), StyleValue::Text("flex".into()));
        style.insert("alignItems".into(), StyleValue::Text("center".into()));
        let layout = layout_from_style(&style).expect("flex layout");
        assert_eq!(layout.arrangement, Arrangement::Flex);
        assert_eq!(layout.direction.as_deref(), Some("row"));
        assert_eq!(layout.cross_axis_alignment.as_deref(), Some("center"));

        style.insert("flexDirection".into(), StyleValue::Text("column".into()));
        let layout = layout_from_style(&style).expect("flex layout");
        assert_eq!(layout.direction.as_deref(), Some("column"));
    }

    #[test]
    fn absolute_position_without_display() {
        let mut style = StyleMap::new();
        assert!(layout_from_style(&style).is_none());
        style.insert("position".into(), StyleValue::Text("absolute".into()));
        let layout = layout_from_style(&style).expect("absolute layout");
        assert_eq!(layout.arrangement, Arrangement::Absolute);
        assert!(layout.direction.is_none());
    }
}
