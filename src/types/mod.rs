//! Core data types.
//!
//! - [`element`] - the canonical element tree both normalizers produce
//! - [`outcome`] - what a comparison run returns

pub mod element;
pub mod outcome;

pub use element::{
    collapse_whitespace, format_number, Arrangement, CanonicalElement, ElementKind,
    LayoutAttributes, Origin, Provenance, StyleMap, StyleValue,
};
pub use outcome::{
    ComparisonOutcome, ExtraElement, MatchMethod, MatchedPair, MissingElement, OverallStatus,
    PropertyDifference, Severity, Verdict,
};
