mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_batch, run_compare};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Compare {
            design,
            markup,
            styles,
            tolerance,
            color_tolerance,
            mode,
            ignore,
            format,
            output,
            top_issues,
        } => run_compare(
            &raw_args,
            args.config,
            design,
            markup,
            styles,
            tolerance,
            color_tolerance,
            mode.into(),
            ignore,
            format,
            output,
            top_issues,
        ),
        Commands::Batch {
            manifest,
            concurrency,
            timeout,
            format,
            output,
        } => {
            run_batch(
                &raw_args,
                args.config,
                manifest,
                concurrency,
                timeout,
                format,
                output,
            )
            .await
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
