use std::path::PathBuf;
use std::process::ExitCode;

use spc_lib::output::{CompareOutput, InputDescriptor};
use spc_lib::{SeverityMode, SpcOutput, UnitContext, UnitSpec};
use tracing::{debug, info};

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for, render_error, write_output};
use crate::settings::{
    format_effective_config, load_config, resolve_compare_settings, validate_config,
    CompareFlagSources,
};

/// Run the compare command.
#[allow(clippy::too_many_arguments)]
pub fn run_compare(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    design: PathBuf,
    markup: PathBuf,
    styles: Option<PathBuf>,
    tolerance: f64,
    color_tolerance: f64,
    mode: SeverityMode,
    ignore: Option<Vec<String>>,
    format: OutputFormat,
    output: Option<PathBuf>,
    top_issues: usize,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let flag_sources = CompareFlagSources::from_args(raw_args);
    let config = resolve_compare_settings(
        tolerance,
        color_tolerance,
        mode,
        ignore.as_deref(),
        &config,
        &flag_sources,
    );
    if let Err(err) = validate_config(&config, config_path.as_deref()) {
        return render_error(err, format, output.clone());
    }
    debug!("{}", format_effective_config(&config, config_path.as_deref()));

    let context = match UnitContext::from_config(&config) {
        Ok(ctx) => ctx,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let unit = UnitSpec {
        name: markup
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unit".to_string()),
        design,
        markup,
        styles,
    };

    info!(design = %unit.design.display(), markup = %unit.markup.display(), "comparing");
    let outcome = match context.compare_unit(&unit) {
        Ok(outcome) => outcome,
        Err(err) => return render_error(err, format, output.clone()),
    };

    let body = SpcOutput::Compare(CompareOutput::new(
        InputDescriptor {
            design: unit.design.display().to_string(),
            markup: unit.markup.display().to_string(),
            styles: unit.styles.as_ref().map(|p| p.display().to_string()),
        },
        config.comparison.clone(),
        outcome,
        top_issues,
    ));
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(spc_lib::SpcError::Config(err.to_string()), format, output);
    }
    exit_code_for(&body)
}
