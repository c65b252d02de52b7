use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::naming::{are_paths_equivalent_by_name, NameResolver};
use crate::types::CanonicalElement;

/// Design path → implementation path for design paths without an exact
/// counterpart.
///
/// Candidates are visited in sorted order and skipped when they already
/// have an exact design counterpart or were claimed by an earlier design
/// path; the first equivalent candidate wins.
pub fn align_paths<'a>(
    design: &BTreeMap<&'a str, &'a CanonicalElement>,
    implementation: &BTreeMap<&'a str, &'a CanonicalElement>,
    resolver: &NameResolver,
) -> BTreeMap<&'a str, &'a str> {
    let alias = |name: &str| resolver.expected_impl_name(name);
    let mut aligned = BTreeMap::new();
    let mut claimed: BTreeSet<&str> = BTreeSet::new();

    for &design_path in design.keys() {
        if implementation.contains_key(design_path) {
            continue;
        }
        let candidate = implementation.keys().copied().find(|impl_path| {
            !design.contains_key(impl_path)
                && !claimed.contains(impl_path)
                && are_paths_equivalent_by_name(design_path, impl_path, alias)
        });
        if let Some(impl_path) = candidate {
            debug!(design = design_path, implementation = impl_path, "aligned path");
            claimed.insert(impl_path);
            aligned.insert(design_path, impl_path);
        }
    }
    aligned
}
