use clap::{Parser, Subcommand, ValueEnum};
use spc_lib::SeverityMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spc")]
#[command(
    version,
    about = "Structural Parity Checker - Compare TSX implementations against design node trees",
    long_about = "Structural Parity Checker (SPC)\n\nModes:\n- compare: check one design export against one TSX/JSX file and its stylesheet.\n- batch: run many comparisons listed in a YAML/JSON manifest.\n\nExit codes: 0 pass or warning, 1 fail, 2 error.\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose (debug) logging on stderr")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML or YAML) with comparison, aliases, opaque_components and batch sections; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare a design export against a TSX/JSX implementation
    Compare {
        #[arg(long, value_name = "PATH", help = "Design export (JSON or YAML)")]
        design: PathBuf,

        #[arg(long, value_name = "PATH", help = "Implementation markup (TSX/JSX)")]
        markup: PathBuf,

        #[arg(long, value_name = "PATH", help = "Stylesheet for the markup (CSS)")]
        styles: Option<PathBuf>,

        #[arg(
            long,
            default_value = "1",
            help = "Absolute tolerance for numeric properties (px)"
        )]
        tolerance: f64,

        #[arg(
            long,
            default_value = "10",
            help = "Maximum RGB distance for colors to count as equal"
        )]
        color_tolerance: f64,

        #[arg(long, value_enum, default_value = "normal", help = "Severity mode")]
        mode: ModeArg,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Properties to skip when diffing (comma-separated, e.g. borderRadius,content)"
        )]
        ignore: Option<Vec<String>>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,

        #[arg(
            long,
            default_value = "5",
            value_name = "N",
            help = "Number of ranked issues to include in the summary"
        )]
        top_issues: usize,
    },

    /// Compare every unit listed in a manifest
    Batch {
        #[arg(
            long,
            value_name = "PATH",
            help = "Manifest (YAML or JSON) listing units {name, design, markup, styles}; paths are relative to the manifest"
        )]
        manifest: PathBuf,

        #[arg(long, default_value = "4", help = "Units compared at the same time")]
        concurrency: usize,

        #[arg(
            long,
            default_value = "30",
            value_name = "SECS",
            help = "Per-unit timeout in seconds (0 disables)"
        )]
        timeout: u64,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Strict,
    Normal,
    Lenient,
}

impl From<ModeArg> for SeverityMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Strict => SeverityMode::Strict,
            ModeArg::Normal => SeverityMode::Normal,
            ModeArg::Lenient => SeverityMode::Lenient,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
    Markdown,
}

pub fn parse() -> Cli {
    Cli::parse()
}
