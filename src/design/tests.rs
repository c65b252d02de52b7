//! Tests for design parsing and normalization.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use crate::config::StrokeOverride;
    use crate::design::{
        design_segment_name, map_node_kind, parse_design_json, parse_design_yaml, DesignNode,
        DesignNormalizer,
    };
    use crate::naming::join_path;
    use crate::types::{Arrangement, CanonicalElement, ElementKind, StyleValue};

    fn node(value: serde_json::Value) -> DesignNode {
        serde_json::from_value(value).expect("valid design node")
    }

    fn normalizer() -> DesignNormalizer {
        DesignNormalizer::new(BTreeMap::new(), Vec::new(), 16.0)
    }

    fn login_screen() -> DesignNode {
        node(json!({
            "id": "1:1",
            "type": "FRAME",
            "name": "LoginScreen",
            "fill": "#ffffff",
            "padding": 24,
            "gap": 16,
            "children": [
                { "id": "1:2", "type": "TEXT", "name": "Title Text", "characters": "  Welcome   back ",
                  "fontSize": 24, "fontWeight": 700, "fill": "#1A1A1A" },
                { "id": "1:3", "type": "RECTANGLE", "name": "divider1", "height": 1, "fill": "#E0E0E0" },
                { "id": "1:4", "type": "RECTANGLE", "name": "divider2", "height": 1, "fill": "#E0E0E0" },
                { "id": "1:5", "type": "INSTANCE", "name": "AvatarBadge", "children": [
                    { "id": "1:6", "type": "ELLIPSE", "name": "ring" }
                ]},
                { "id": "1:7", "type": "FRAME", "name": "hidden", "visible": false }
            ]
        }))
    }

    #[test]
    fn text_node_styles_follow_fill_rule() {
        let design = node(json!({
            "id": "1", "type": "text", "name": "title", "fontSize": 16, "fill": "#000000",
            "characters": "Sign in"
        }));
        let el = normalizer().normalize(&design);

        assert_eq!(el.kind, ElementKind::Text);
        assert_eq!(el.path, "Title");
        assert_eq!(el.style.get("fontSize"), Some(&StyleValue::Number(16.0)));
        assert_eq!(el.style.get("color"), Some(&StyleValue::Color("#000000".into())));
        assert!(el.style.get("backgroundColor").is_none());
        assert_eq!(el.text_content.as_deref(), Some("Sign in"));
    }

    #[test]
    fn stroke_over_matching_background_is_not_recorded() {
        let design = node(json!({
            "id": "2", "type": "FRAME", "name": "toolbar", "fill": "rgba(0, 188, 212, 0.12)",
            "children": [
                { "id": "3", "type": "FRAME", "name": "settingsButton",
                  "fill": "rgba(0, 188, 212, 0.12)",
                  "stroke": { "fill": "#00BCD4", "thickness": 1 } }
            ]
        }));
        let el = normalizer().normalize(&design);
        let button = &el.children()[0];

        assert_eq!(button.path, "Toolbar > settingsButton[0]");
        assert!(!button.style.contains_key("borderColor"));
        assert!(!button.style.contains_key("borderWidth"));
    }

    #[test]
    fn override_table_suppresses_named_strokes() {
        let overrides = vec![StrokeOverride {
            node_name: "settingsButton".into(),
            background: "rgba(0, 150, 136".into(),
            stroke: "#00BCD4".into(),
        }];
        let normalizer = DesignNormalizer::new(BTreeMap::new(), overrides, 16.0);
        let design = node(json!({
            "id": "3", "type": "FRAME", "name": "settingsButton",
            "fill": "rgba(0, 150, 136, 0.2)",
            "stroke": { "fill": "#00BCD4", "thickness": 2 }
        }));

        let el = normalizer.normalize(&design);
        assert!(!el.style.contains_key("borderColor"));

        let el = self::normalizer().normalize(&design);
        assert_eq!(
            el.style.get("borderColor"),
            Some(&StyleValue::Color("#00BCD4".into()))
        );
        assert_eq!(el.style.get("borderWidth"), Some(&StyleValue::Number(2.0)));
    }

    #[test]
    fn paths_strip_suffixes_and_skip_hidden_nodes() {
        let el = normalizer().normalize(&login_screen());
        let paths: Vec<&str> = el.children().iter().map(|c| c.path.as_str()).collect();

        assert_eq!(
            paths,
            vec![
                "LoginScreen > titleText[0]",
                "LoginScreen > divider[1]",
                "LoginScreen > divider[2]",
                "LoginScreen > AvatarBadge[3]",
            ]
        );
        assert_eq!(
            el.children()[0].text_content.as_deref(),
            Some("Welcome back")
        );
    }

    #[test]
    fn root_captures_box_styles_and_defaults_to_vertical_flex() {
        let el = normalizer().normalize(&login_screen());

        assert_eq!(el.path, "LoginScreen");
        assert_eq!(el.style.get("padding"), Some(&StyleValue::Number(24.0)));
        assert_eq!(el.style.get("gap"), Some(&StyleValue::Number(16.0)));
        assert_eq!(
            el.style.get("backgroundColor"),
            Some(&StyleValue::Color("#FFFFFF".into()))
        );
        let layout = el.layout.expect("root layout");
        assert_eq!(layout.arrangement, Arrangement::Flex);
        assert_eq!(layout.direction.as_deref(), Some("column"));
    }

    #[test]
    fn opaque_components_never_carry_children() {
        let mut opaque = BTreeMap::new();
        opaque.insert("AvatarBadge".to_string(), "Avatar".to_string());
        let normalizer = DesignNormalizer::new(opaque, Vec::new(), 16.0);

        let el = normalizer.normalize(&login_screen());
        let badge = &el.children()[3];
        assert!(badge.is_opaque());
        assert!(badge.children.is_none());
        assert_eq!(
            badge.provenance.opaque_counterpart_name.as_deref(),
            Some("Avatar")
        );

        for element in el.walk() {
            if element.is_opaque() {
                assert!(element.children.is_none());
            }
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let design = login_screen();
        let first = normalizer().normalize(&design);
        let second = normalizer().normalize(&design);

        let shape = |root: &CanonicalElement| {
            root.walk()
                .into_iter()
                .map(|e| (e.path.clone(), e.kind, e.style.clone(), e.text_content.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(shape(&first), shape(&second));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn stored_paths_can_be_rederived() {
        fn check(parent: &CanonicalElement) {
            for (idx, child) in parent.children().iter().enumerate() {
                assert_eq!(child.path, join_path(Some(&parent.path), &child.name, idx));
                check(child);
            }
        }
        let root = normalizer().normalize(&login_screen());
        assert_eq!(root.path, join_path(None, &root.name, 0));
        check(&root);
    }

    #[test]
    fn figma_api_fields_are_understood() {
        let design = parse_design_json(
            r#"{
                "document": {
                    "id": "0:1", "type": "FRAME", "name": "Card",
                    "fills": [{ "type": "SOLID", "color": { "r": 1, "g": 1, "b": 1, "a": 1 } }],
                    "strokes": [{ "type": "SOLID", "color": { "r": 0.878, "g": 0.878, "b": 0.878, "a": 1 } }],
                    "strokeWeight": 1,
                    "paddingLeft": 16, "paddingRight": 16, "paddingTop": 8, "paddingBottom": 8,
                    "itemSpacing": 12, "cornerRadius": 8,
                    "layoutMode": "HORIZONTAL", "primaryAxisAlignItems": "SPACE_BETWEEN",
                    "counterAxisAlignItems": "CENTER",
                    "absoluteBoundingBox": { "x": 0, "y": 0, "width": 320, "height": 64 },
                    "children": [
                        { "id": "0:2", "type": "TEXT", "name": "label", "characters": "Hello",
                          "style": { "fontSize": 14, "fontWeight": 500 },
                          "fills": [{ "type": "SOLID", "color": { "r": 0, "g": 0, "b": 0 } }] }
                    ]
                }
            }"#,
        )
        .expect("figma document parses");

        let el = normalizer().normalize(&design);
        assert_eq!(
            el.style.get("padding"),
            Some(&StyleValue::Text("8px 16px 8px 16px".into()))
        );
        assert_eq!(el.style.get("gap"), Some(&StyleValue::Number(12.0)));
        assert_eq!(el.style.get("borderRadius"), Some(&StyleValue::Number(8.0)));
        assert_eq!(el.style.get("width"), Some(&StyleValue::Number(320.0)));
        assert_eq!(
            el.style.get("borderColor"),
            Some(&StyleValue::Color("#E0E0E0".into()))
        );

        let layout = el.layout.as_ref().expect("layout");
        assert_eq!(layout.direction.as_deref(), Some("row"));
        assert_eq!(layout.main_axis_alignment.as_deref(), Some("space-between"));
        assert_eq!(layout.cross_axis_alignment.as_deref(), Some("center"));

        let label = &el.children()[0];
        assert_eq!(label.style.get("fontSize"), Some(&StyleValue::Number(14.0)));
        assert_eq!(label.style.get("fontWeight"), Some(&StyleValue::Number(500.0)));
        assert_eq!(label.style.get("color"), Some(&StyleValue::Color("#000000".into())));
    }

    #[test]
    fn yaml_exports_parse() {
        let design = parse_design_yaml(
            "id: '1'\ntype: BUTTON\nname: submit\ncharacters: Sign in\nfontWeight: bold\n",
        )
        .expect("yaml parses");
        let el = normalizer().normalize(&design);
        assert_eq!(el.kind, ElementKind::Button);
        assert_eq!(el.style.get("fontWeight"), Some(&StyleValue::Text("bold".into())));
    }

    #[test]
    fn kind_table_defaults_to_container() {
        assert_eq!(map_node_kind("TEXT"), ElementKind::Text);
        assert_eq!(map_node_kind("vector"), ElementKind::Icon);
        assert_eq!(map_node_kind("TextField"), ElementKind::Input);
        assert_eq!(map_node_kind("SLICE"), ElementKind::Container);
        assert_eq!(design_segment_name("Sign In Label", ElementKind::Text), "signInLabel");
        assert_eq!(design_segment_name("divider3", ElementKind::Container), "divider");
    }
}
