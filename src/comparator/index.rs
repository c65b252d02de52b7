//! Path and content indexes over canonical forests.

use std::collections::BTreeMap;

use tracing::debug;

use crate::types::CanonicalElement;

/// Every node of a forest in pre-order (roots in order, each followed by
/// its descendants).
pub fn flatten(forest: &[CanonicalElement]) -> Vec<&CanonicalElement> {
    forest.iter().flat_map(CanonicalElement::walk).collect()
}

/// Path → element. The first occurrence of a duplicated path wins; later
/// ones are left to the caller.
pub fn index_by_path<'a>(
    elements: &[&'a CanonicalElement],
) -> BTreeMap<&'a str, &'a CanonicalElement> {
    let mut index = BTreeMap::new();
    for element in elements {
        if index.contains_key(element.path.as_str()) {
            debug!(path = %element.path, "duplicate path; indexing first occurrence");
            continue;
        }
        index.insert(element.path.as_str(), *element);
    }
    index
}

/// Trimmed, lower-cased text → elements carrying it, in encounter order.
pub fn index_by_content<'a>(
    elements: &[&'a CanonicalElement],
) -> BTreeMap<String, Vec<&'a CanonicalElement>> {
    let mut index: BTreeMap<String, Vec<&'a CanonicalElement>> = BTreeMap::new();
    for element in elements {
        if let Some(key) = element.content_key() {
            index.entry(key).or_default().push(*element);
        }
    }
    index
}
