//! Name and path equivalence between design-side and implementation-side trees.
//!
//! Paths look like `Root > header[0] > title[1]`: the root segment carries no
//! index, every nested segment carries its sibling position.

use std::collections::BTreeMap;

pub const PATH_SEPARATOR: &str = " > ";

/// Alias tables bridging design-tool names and implementation names.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    design_to_impl: BTreeMap<String, String>,
    impl_to_design: BTreeMap<String, String>,
    class_to_design: BTreeMap<String, String>,
}

impl NameResolver {
    pub fn new(
        design_to_impl: BTreeMap<String, String>,
        class_to_design: BTreeMap<String, String>,
    ) -> Self {
        let impl_to_design = design_to_impl
            .iter()
            .map(|(design, implementation)| (implementation.clone(), design.clone()))
            .collect();
        Self {
            design_to_impl,
            impl_to_design,
            class_to_design,
        }
    }

    pub fn forward_alias(&self, design_name: &str) -> Option<&str> {
        self.design_to_impl.get(design_name).map(String::as_str)
    }

    pub fn reverse_alias(&self, impl_name: &str) -> Option<&str> {
        self.impl_to_design
            .get(impl_name)
            .or_else(|| self.class_to_design.get(impl_name))
            .map(String::as_str)
    }

    /// Design name a class token stands for, used when building
    /// implementation paths.
    pub fn design_name_for_class(&self, class_name: &str) -> Option<&str> {
        self.class_to_design.get(class_name).map(String::as_str)
    }

    pub fn are_names_equivalent(&self, a: &str, b: &str) -> bool {
        a == b || self.forward_alias(a) == Some(b) || self.reverse_alias(b) == Some(a)
    }

    /// Implementation-side name expected for a design segment name: its
    /// alias, else the alias of its suffix-stripped form, else the stripped
    /// form itself.
    pub fn expected_impl_name(&self, design_name: &str) -> String {
        if let Some(alias) = self.forward_alias(design_name) {
            return alias.to_string();
        }
        let stripped = strip_numeric_suffix(design_name);
        self.forward_alias(stripped)
            .unwrap_or(stripped)
            .to_string()
    }
}

pub fn path_segments(path: &str) -> Vec<&str> {
    path.split(PATH_SEPARATOR).collect()
}

/// Segment without its `[index]` suffix.
pub fn segment_name(segment: &str) -> &str {
    match segment.rfind('[') {
        Some(pos) if segment.ends_with(']') => &segment[..pos],
        _ => segment,
    }
}

pub fn join_path(parent: Option<&str>, name: &str, sibling_index: usize) -> String {
    match parent {
        Some(parent) => format!("{parent}{PATH_SEPARATOR}{name}[{sibling_index}]"),
        None => name.to_string(),
    }
}

/// Loose path equivalence: exact match, or same root segment and same final
/// segment name once `alias_fn` maps the design side. Intermediate segments
/// are ignored so wrapper elements between root and leaf do not matter.
pub fn are_paths_equivalent_by_name<F>(design_path: &str, impl_path: &str, alias_fn: F) -> bool
where
    F: Fn(&str) -> String,
{
    if design_path == impl_path {
        return true;
    }
    let design = path_segments(design_path);
    let implementation = path_segments(impl_path);
    let (Some(d_root), Some(i_root)) = (design.first(), implementation.first()) else {
        return false;
    };
    if segment_name(d_root) != segment_name(i_root) {
        return false;
    }
    let (Some(d_last), Some(i_last)) = (design.last(), implementation.last()) else {
        return false;
    };
    alias_fn(segment_name(d_last)) == segment_name(i_last)
}

/// `divider12` → `divider`. Names made only of digits are left alone.
pub fn strip_numeric_suffix(name: &str) -> &str {
    let stripped = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if stripped.is_empty() {
        name
    } else {
        stripped
    }
}

/// True when both names agree on their first `min_len` characters
/// (case-insensitive).
pub fn shares_prefix(a: &str, b: &str, min_len: usize) -> bool {
    let a: Vec<char> = a.chars().flat_map(char::to_lowercase).collect();
    let b: Vec<char> = b.chars().flat_map(char::to_lowercase).collect();
    a.len() >= min_len && b.len() >= min_len && a[..min_len] == b[..min_len]
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn lowercase_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Text-node naming: drop non-alphanumerics, lower-case the first letter.
pub fn normalize_text_name(name: &str) -> String {
    let alnum: String = name.chars().filter(|c| c.is_alphanumeric()).collect();
    lowercase_first(&alnum)
}
