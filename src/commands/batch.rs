use std::path::PathBuf;
use std::process::ExitCode;

use spc_lib::output::BatchOutput;
use spc_lib::{BatchRunner, Manifest, SpcError, SpcOutput};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for, render_error, write_output};
use crate::settings::{
    format_effective_config, load_config, resolve_batch_settings, validate_config,
    BatchFlagSources,
};

/// Run the batch command.
pub async fn run_batch(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    manifest: PathBuf,
    concurrency: usize,
    timeout: u64,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let flag_sources = BatchFlagSources::from_args(raw_args);
    let config = resolve_batch_settings(concurrency, timeout, &config, &flag_sources);
    if let Err(err) = validate_config(&config, config_path.as_deref()) {
        return render_error(err, format, output.clone());
    }
    debug!("{}", format_effective_config(&config, config_path.as_deref()));

    let units = match Manifest::load(&manifest) {
        Ok(m) => m.units,
        Err(err) => return render_error(err, format, output.clone()),
    };
    let runner = match BatchRunner::from_config(&config) {
        Ok(runner) => runner,
        Err(err) => return render_error(err, format, output.clone()),
    };

    let reports = runner.run(units).await;
    let body = SpcOutput::Batch(BatchOutput::new(manifest.display().to_string(), reports));
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(SpcError::Config(err.to_string()), format, output);
    }
    exit_code_for(&body)
}
