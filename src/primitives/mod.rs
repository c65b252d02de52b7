//! Pure value-level helpers: colors, units and tolerant equality.

pub mod color;
pub mod equality;
pub mod units;

pub use color::{
    color_distance, colors_equal, contrast_ratio, hex_to_rgb, normalize_color, parse_rgba,
    rgb_to_hex, rgba_to_css, Rgb, Rgba, UNPARSABLE_COLOR_DISTANCE,
};
pub use equality::{numeric_magnitude, values_equal};
pub use units::{
    box_from_sides, canonical_box_value, coerce_property_value, expand_box_shorthand,
    parse_style_value, BoxSides, DEFAULT_ROOT_FONT_SIZE,
};
