use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use spc_lib::batch::UnitStatus;
use spc_lib::output::{BatchOutput, CompareOutput, SPC_OUTPUT_VERSION};
use spc_lib::{ErrorOutput, OverallStatus, SpcError, SpcOutput};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &SpcOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
        OutputFormat::Markdown => write_text(&format_markdown(body), output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: SpcError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    tracing::error!(error = %err, "command failed");
    let error_payload = err.to_payload();
    let payload = SpcOutput::Error(ErrorOutput {
        version: SPC_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
        OutputFormat::Markdown => {
            if let Err(write_err) = write_text(&format_markdown(&payload), output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // Reserve exit code 2 for fatal/errors; parity failures use 1.
    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(body: &SpcOutput, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &SpcOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    write_text(&content, output)
}

fn write_text(content: &str, output: Option<&Path>) -> io::Result<()> {
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &SpcOutput, colorize: bool) -> String {
    match body {
        SpcOutput::Compare(out) => {
            let mut buf = String::new();
            write_compare_pretty(&mut buf, out, colorize);
            buf
        }
        SpcOutput::Batch(out) => {
            let mut buf = String::new();
            let status = if out.passed { "PASS" } else { "FAIL" };
            let status_colored = color(status, if out.passed { "32" } else { "31" }, colorize);
            writeln!(buf, "{} Batch {}", status_colored, out.manifest).ok();
            let s = &out.summary;
            writeln!(
                buf,
                "Units: {} total, {} passed, {} warned, {} failed, {} skipped, {} errored, {} timed out",
                s.total, s.passed, s.warned, s.failed, s.skipped, s.errored, s.timed_out
            )
            .ok();
            for unit in &out.units {
                let (label, code) = unit_label(&unit.status);
                let detail = match &unit.status {
                    UnitStatus::Compared { outcome } => {
                        format!("{:.1}% matched", outcome.verdict.match_rate_percent)
                    }
                    UnitStatus::Skipped { reason } => reason.clone(),
                    UnitStatus::Failed { message } => message.clone(),
                    UnitStatus::TimedOut { timeout_ms } => format!("after {timeout_ms}ms"),
                };
                writeln!(
                    buf,
                    "- {:10} {} ({})",
                    color(label, code, colorize),
                    unit.name,
                    detail
                )
                .ok();
            }
            buf
        }
        SpcOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

fn write_compare_pretty(buf: &mut String, out: &CompareOutput, colorize: bool) {
    let verdict = &out.outcome.verdict;
    let (status, code) = status_label(verdict.overall_status);
    writeln!(buf, "{} Structural parity check", color(status, code, colorize)).ok();
    writeln!(buf, "Design: {}", out.input.design).ok();
    writeln!(buf, "Markup: {}", out.input.markup).ok();
    let rate = format!("{:.1}%", verdict.match_rate_percent);
    writeln!(
        buf,
        "Match rate: {} ({} of {} elements)",
        color(&rate, rate_color_code(verdict.match_rate_percent), colorize),
        verdict.matched_count,
        verdict.total_elements
    )
    .ok();
    writeln!(
        buf,
        "Missing: {}  Extra: {}  Differences: {}",
        out.outcome.missing_in_implementation.len(),
        out.outcome.extra_in_implementation.len(),
        out.outcome.property_differences.len()
    )
    .ok();

    let issues: Vec<String> = out
        .summary
        .as_ref()
        .map(|s| s.top_issues.clone())
        .unwrap_or_default();
    if !issues.is_empty() {
        writeln!(buf, "Top issues:").ok();
        for issue in issues {
            writeln!(buf, "- {issue}").ok();
        }
    }
}

/// Format output as a Markdown report.
pub fn format_markdown(body: &SpcOutput) -> String {
    let mut buf = String::new();
    match body {
        SpcOutput::Compare(out) => write_compare_markdown(&mut buf, out),
        SpcOutput::Batch(out) => write_batch_markdown(&mut buf, out),
        SpcOutput::Error(out) => {
            writeln!(buf, "## Error\n").ok();
            writeln!(buf, "{}\n", out.error.message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "> {}", remediation).ok();
            }
        }
    }
    buf
}

fn write_compare_markdown(buf: &mut String, out: &CompareOutput) {
    let verdict = &out.outcome.verdict;
    let (status, _) = status_label(verdict.overall_status);
    writeln!(buf, "## Structural parity: {status}\n").ok();
    writeln!(buf, "- Design: `{}`", out.input.design).ok();
    writeln!(buf, "- Markup: `{}`", out.input.markup).ok();
    if let Some(styles) = &out.input.styles {
        writeln!(buf, "- Styles: `{}`", styles).ok();
    }
    writeln!(
        buf,
        "- Match rate: {:.1}% ({} of {} elements)\n",
        verdict.match_rate_percent, verdict.matched_count, verdict.total_elements
    )
    .ok();

    if !out.outcome.missing_in_implementation.is_empty() {
        writeln!(buf, "### Missing in implementation\n").ok();
        writeln!(buf, "| Path | Kind | Severity | Suggested fix |").ok();
        writeln!(buf, "| --- | --- | --- | --- |").ok();
        for m in &out.outcome.missing_in_implementation {
            writeln!(
                buf,
                "| `{}` | {} | {} | {} |",
                m.path,
                m.element.kind,
                m.severity,
                escape_cell(m.suggested_fix.as_deref().unwrap_or(""))
            )
            .ok();
        }
        writeln!(buf).ok();
    }

    if !out.outcome.extra_in_implementation.is_empty() {
        writeln!(buf, "### Extra in implementation\n").ok();
        writeln!(buf, "| Path | Kind | Severity |").ok();
        writeln!(buf, "| --- | --- | --- |").ok();
        for e in &out.outcome.extra_in_implementation {
            writeln!(buf, "| `{}` | {} | {} |", e.path, e.element.kind, e.severity).ok();
        }
        writeln!(buf).ok();
    }

    if !out.outcome.property_differences.is_empty() {
        writeln!(buf, "### Property differences\n").ok();
        writeln!(buf, "| Path | Property | Design | Implementation | Severity |").ok();
        writeln!(buf, "| --- | --- | --- | --- | --- |").ok();
        for d in &out.outcome.property_differences {
            let show = |v: &Option<spc_lib::StyleValue>| {
                v.as_ref()
                    .map(|v| escape_cell(&v.to_string()))
                    .unwrap_or_else(|| "-".to_string())
            };
            writeln!(
                buf,
                "| `{}` | {} | {} | {} | {} |",
                d.path,
                d.property,
                show(&d.design_value),
                show(&d.impl_value),
                d.severity
            )
            .ok();
        }
        writeln!(buf).ok();
    }
}

fn write_batch_markdown(buf: &mut String, out: &BatchOutput) {
    let status = if out.passed { "PASS" } else { "FAIL" };
    writeln!(buf, "## Batch `{}`: {}\n", out.manifest, status).ok();
    writeln!(buf, "| Unit | Status | Match rate | Duration |").ok();
    writeln!(buf, "| --- | --- | --- | --- |").ok();
    for unit in &out.units {
        let (label, _) = unit_label(&unit.status);
        let rate = match &unit.status {
            UnitStatus::Compared { outcome } => {
                format!("{:.1}%", outcome.verdict.match_rate_percent)
            }
            _ => "-".to_string(),
        };
        writeln!(
            buf,
            "| {} | {} | {} | {}ms |",
            unit.name, label, rate, unit.duration_ms
        )
        .ok();
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn status_label(status: OverallStatus) -> (&'static str, &'static str) {
    match status {
        OverallStatus::Pass => ("PASS", "32"),
        OverallStatus::Warning => ("WARN", "33"),
        OverallStatus::Fail => ("FAIL", "31"),
    }
}

fn unit_label(status: &UnitStatus) -> (&'static str, &'static str) {
    match status {
        UnitStatus::Compared { outcome } => status_label(outcome.verdict.overall_status),
        UnitStatus::Skipped { .. } => ("SKIP", "36"),
        UnitStatus::Failed { .. } => ("ERROR", "31"),
        UnitStatus::TimedOut { .. } => ("TIMEOUT", "31"),
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Map match rate to ANSI color code.
fn rate_color_code(rate: f64) -> &'static str {
    if rate >= 90.0 {
        "32" // green
    } else if rate >= 75.0 {
        "33" // yellow
    } else {
        "31" // red
    }
}

/// Exit code for a finished run: 0 when passed, 1 otherwise.
pub fn exit_code_for(body: &SpcOutput) -> ExitCode {
    match body.passed() {
        Some(true) => ExitCode::SUCCESS,
        Some(false) => ExitCode::from(1),
        None => ExitCode::from(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spc_lib::batch::UnitReport;
    use spc_lib::output::InputDescriptor;
    use spc_lib::{
        compare_trees, CanonicalElement, ComparisonOptions, ElementKind, NameResolver,
    };
    use spc_lib::types::Origin;

    fn compare_output(missing: bool) -> SpcOutput {
        let design = CanonicalElement::new(
            Origin::Design,
            ElementKind::Button,
            "Submit".into(),
            "Submit[0]".into(),
        );
        let implementation = if missing {
            Vec::new()
        } else {
            vec![CanonicalElement::new(
                Origin::Implementation,
                ElementKind::Button,
                "Submit".into(),
                "Submit[0]".into(),
            )]
        };
        let outcome = compare_trees(
            &[design],
            &implementation,
            &ComparisonOptions::default(),
            &NameResolver::default(),
        );
        SpcOutput::Compare(CompareOutput::new(
            InputDescriptor {
                design: "login.json".into(),
                markup: "Login.tsx".into(),
                styles: Some("Login.css".into()),
            },
            ComparisonOptions::default(),
            outcome,
            5,
        ))
    }

    #[test]
    fn exit_code_maps_pass_fail() {
        assert_eq!(exit_code_for(&compare_output(false)), ExitCode::SUCCESS);
        assert_eq!(exit_code_for(&compare_output(true)), ExitCode::from(1));
    }

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let code = render_error(
            SpcError::Config("boom".to_string()),
            OutputFormat::Json,
            None,
        );
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn format_pretty_includes_status_rate_and_issues() {
        let pretty = format_pretty(&compare_output(true), false);
        assert!(pretty.contains("FAIL Structural parity check"));
        assert!(pretty.contains("Match rate: 0.0% (0 of 1 elements)"));
        assert!(pretty.contains("Top issues:"));
        assert!(pretty.contains("Missing button at `Submit[0]`"));

        let pretty = format_pretty(&compare_output(false), false);
        assert!(pretty.contains("PASS Structural parity check"));
        assert!(!pretty.contains("Top issues"));
    }

    #[test]
    fn format_markdown_lists_missing_elements() {
        let md = format_markdown(&compare_output(true));
        assert!(md.starts_with("## Structural parity: FAIL"));
        assert!(md.contains("- Styles: `Login.css`"));
        assert!(md.contains("### Missing in implementation"));
        assert!(md.contains("| `Submit[0]` | button | error |"));
    }

    #[test]
    fn format_batch_reports_each_unit() {
        let output = SpcOutput::Batch(BatchOutput::new(
            "units.yaml".into(),
            vec![
                UnitReport {
                    name: "login".into(),
                    status: UnitStatus::TimedOut { timeout_ms: 30000 },
                    duration_ms: 30001,
                },
                UnitReport {
                    name: "card".into(),
                    status: UnitStatus::Skipped {
                        reason: "syntax error at line 2, column 4".into(),
                    },
                    duration_ms: 2,
                },
            ],
        ));

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("FAIL Batch units.yaml"));
        assert!(pretty.contains("1 skipped"));
        assert!(pretty.contains("TIMEOUT"));

        let md = format_markdown(&output);
        assert!(md.contains("| card | SKIP | - | 2ms |"));
        assert!(md.contains("| login | TIMEOUT | - | 30001ms |"));
        assert_eq!(exit_code_for(&output), ExitCode::from(1));
    }

    #[test]
    fn format_pretty_handles_errors() {
        let output = SpcOutput::Error(ErrorOutput {
            version: SPC_OUTPUT_VERSION.to_string(),
            message: Some("bad input".to_string()),
            error: spc_lib::error::ErrorPayload {
                category: spc_lib::error::ErrorCategory::Config,
                message: "bad input".to_string(),
                remediation: Some("check flags".to_string()),
            },
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ERROR] bad input"));
        assert!(pretty.contains("Hint: check flags"));
    }
}
