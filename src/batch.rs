//! Batch comparison of many independent units.
//!
//! A manifest lists units (design export, markup, optional stylesheet).
//! Units run on blocking workers with bounded concurrency; reports come back
//! in completion order.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::comparator::compare_trees;
use crate::config::{ComparisonOptions, Config};
use crate::design::{load_design, DesignNode, DesignNormalizer};
use crate::error::{Result, SpcError};
use crate::markup::ImplementationNormalizer;
use crate::naming::NameResolver;
use crate::types::{ComparisonOutcome, OverallStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub units: Vec<UnitSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    pub design: PathBuf,
    pub markup: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<PathBuf>,
}

impl Manifest {
    /// Load a YAML or JSON manifest; unit paths are made relative to the
    /// manifest's directory.
    pub fn load(path: &Path) -> Result<Manifest> {
        if !path.exists() {
            return Err(SpcError::Config(format!(
                "File not found: {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let manifest: Manifest = if is_json {
            serde_json::from_str(&text)?
        } else {
            serde_yaml::from_str(&text)?
        };
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(manifest.resolve_against(base))
    }

    pub fn resolve_against(self, base: &Path) -> Manifest {
        let join = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        Manifest {
            units: self
                .units
                .into_iter()
                .map(|u| UnitSpec {
                    name: u.name,
                    design: join(u.design),
                    markup: join(u.markup),
                    styles: u.styles.map(join),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum UnitStatus {
    Compared { outcome: ComparisonOutcome },
    Skipped { reason: String },
    Failed { message: String },
    #[serde(rename_all = "camelCase")]
    TimedOut { timeout_ms: u64 },
}

impl UnitStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UnitStatus::Compared { .. } => "compared",
            UnitStatus::Skipped { .. } => "skipped",
            UnitStatus::Failed { .. } => "failed",
            UnitStatus::TimedOut { .. } => "timed-out",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitReport {
    pub name: String,
    #[serde(flatten)]
    pub status: UnitStatus,
    pub duration_ms: u64,
}

impl UnitReport {
    pub fn overall_status(&self) -> Option<OverallStatus> {
        match &self.status {
            UnitStatus::Compared { outcome } => Some(outcome.verdict.overall_status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errored: usize,
    pub timed_out: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[UnitReport]) -> Self {
        let mut summary = BatchSummary {
            total: reports.len(),
            ..BatchSummary::default()
        };
        for report in reports {
            match &report.status {
                UnitStatus::Compared { outcome } => match outcome.verdict.overall_status {
                    OverallStatus::Pass => summary.passed += 1,
                    OverallStatus::Warning => summary.warned += 1,
                    OverallStatus::Fail => summary.failed += 1,
                },
                UnitStatus::Skipped { .. } => summary.skipped += 1,
                UnitStatus::Failed { .. } => summary.errored += 1,
                UnitStatus::TimedOut { .. } => summary.timed_out += 1,
            }
        }
        summary
    }

    /// Skipped units do not fail a batch; failures, errors and timeouts do.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errored == 0 && self.timed_out == 0
    }
}

/// Shared, read-only state every unit comparison needs.
#[derive(Debug, Clone)]
pub struct UnitContext {
    pub design: DesignNormalizer,
    pub markup: ImplementationNormalizer,
    pub resolver: NameResolver,
    pub options: ComparisonOptions,
}

impl UnitContext {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            design: DesignNormalizer::from_config(config),
            markup: ImplementationNormalizer::from_config(config)?,
            resolver: config.name_resolver(),
            options: config.comparison.clone(),
        })
    }

    /// Load, normalize and compare one unit synchronously.
    pub fn compare_unit(&self, unit: &UnitSpec) -> Result<ComparisonOutcome> {
        let design_root = load_design(&unit.design)?;
        let markup = read_source(&unit.markup)?;
        let css = match &unit.styles {
            Some(path) => read_source(path)?,
            None => String::new(),
        };

        self.compare_sources(&design_root, &markup, &css)
    }

    /// Normalize both sides from in-memory inputs and compare them.
    pub fn compare_sources(
        &self,
        design_root: &DesignNode,
        markup: &str,
        css: &str,
    ) -> Result<ComparisonOutcome> {
        let design = self.design.normalize(design_root);
        let implementation = self.markup.normalize(markup, css)?;
        Ok(compare_trees(
            std::slice::from_ref(&design),
            &implementation,
            &self.options,
            &self.resolver,
        ))
    }
}

fn read_source(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(SpcError::Config(format!(
            "File not found: {}",
            path.display()
        )));
    }
    Ok(std::fs::read_to_string(path)?)
}

pub struct BatchRunner {
    context: Arc<UnitContext>,
    concurrency: usize,
    timeout: Option<Duration>,
}

impl BatchRunner {
    pub fn new(context: UnitContext, concurrency: usize, timeout: Option<Duration>) -> Self {
        Self {
            context: Arc::new(context),
            concurrency: concurrency.max(1),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            UnitContext::from_config(config)?,
            config.batch.concurrency,
            config.batch.timeout,
        ))
    }

    /// Run every unit; reports are returned in completion order.
    pub async fn run(&self, units: Vec<UnitSpec>) -> Vec<UnitReport> {
        info!(
            units = units.len(),
            concurrency = self.concurrency,
            "starting batch"
        );
        let timeout = self.timeout;
        let reports: Vec<UnitReport> = stream::iter(units)
            .map(|unit| {
                let context = Arc::clone(&self.context);
                let name = unit.name.clone();
                let work = tokio::task::spawn_blocking(move || context.compare_unit(&unit));
                settle(name, work, timeout)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let summary = BatchSummary::from_reports(&reports);
        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            errored = summary.errored,
            timed_out = summary.timed_out,
            "batch complete"
        );
        reports
    }
}

/// Await one unit's work under an optional deadline and classify the result.
/// A unit that misses the deadline is abandoned; its late result is dropped.
pub(crate) async fn settle<F>(name: String, work: F, timeout: Option<Duration>) -> UnitReport
where
    F: Future<Output = std::result::Result<Result<ComparisonOutcome>, JoinError>>,
{
    let started = Instant::now();
    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, work).await.ok(),
        None => Some(work.await),
    };

    let status = match joined {
        None => {
            let timeout_ms = timeout.map(|t| t.as_millis() as u64).unwrap_or_default();
            warn!(unit = %name, timeout_ms, "unit timed out");
            UnitStatus::TimedOut { timeout_ms }
        }
        Some(Ok(Ok(outcome))) => {
            debug!(unit = %name, status = %outcome.verdict.overall_status, "unit compared");
            UnitStatus::Compared { outcome }
        }
        Some(Ok(Err(e))) if e.is_skip() => {
            warn!(unit = %name, error = %e, "unit skipped");
            UnitStatus::Skipped {
                reason: e.to_string(),
            }
        }
        Some(Ok(Err(e))) => {
            warn!(unit = %name, error = %e, "unit failed");
            UnitStatus::Failed {
                message: e.to_string(),
            }
        }
        Some(Err(join_error)) => {
            warn!(unit = %name, error = %join_error, "unit worker panicked");
            UnitStatus::Failed {
                message: format!("worker failed: {join_error}"),
            }
        }
    };

    UnitReport {
        name,
        status,
        duration_ms: started.elapsed().as_millis() as u64,
    }
}
