//! Structural Parity Checker (SPC) Library
//!
//! Compares a design node tree against a TSX/JSX implementation plus its
//! stylesheet. Both sides are reduced to the same canonical element tree,
//! aligned by hierarchical path (with name aliases and a content fallback),
//! and diffed property by property into a verdict.
//!
//! # Module Overview
//!
//! - [`types`] - Canonical element tree and comparison result types
//! - [`primitives`] - Color, unit and tolerant-equality helpers
//! - [`naming`] - Path building and name-alias resolution
//! - [`stylesheet`] - Class-rule extraction from CSS
//! - [`design`] - Design export parsing and normalization
//! - [`markup`] - TSX/JSX parsing and normalization
//! - [`comparator`] - Alignment, diffing and verdicts
//! - [`batch`] - Concurrent comparison of many units
//! - [`config`] - Configuration file support
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use spc_lib::{Config, UnitContext};
//!
//! # fn example() -> spc_lib::Result<()> {
//! let config = Config::load(None)?;
//! let context = UnitContext::from_config(&config)?;
//! let design = spc_lib::load_design(std::path::Path::new("login.json"))?;
//! let outcome = context.compare_sources(&design, "<div className=\"login\" />", "")?;
//! println!("{}", outcome.verdict.overall_status);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod comparator;
pub mod config;
pub mod design;
pub mod error;
pub mod markup;
pub mod naming;
pub mod output;
pub mod primitives;
pub mod stylesheet;
pub mod types;

pub use batch::{BatchRunner, BatchSummary, Manifest, UnitContext, UnitReport, UnitSpec, UnitStatus};
pub use comparator::{compare_trees, generate_top_issues};
pub use config::{ComparisonOptions, Config, SeverityMode};
pub use design::{load_design, parse_design_json, parse_design_yaml, DesignNode, DesignNormalizer};
pub use error::{ErrorCategory, ErrorPayload, Result, SpcError};
pub use markup::ImplementationNormalizer;
pub use naming::NameResolver;
pub use output::{
    BatchOutput, CompareOutput, ErrorOutput, InputDescriptor, SpcOutput, Summary,
    SPC_OUTPUT_VERSION,
};
pub use stylesheet::{parse_stylesheet, reduce_stylesheet, Stylesheet};
pub use types::{
    CanonicalElement, ComparisonOutcome, ElementKind, MatchMethod, OverallStatus, Severity,
    StyleValue, Verdict,
};

/// Route `tracing` output through the test harness. Safe to call from
/// every test; only the first call installs the subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
