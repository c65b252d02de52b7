use std::path::Path;
use std::time::Duration;

use spc_lib::{ComparisonOptions, Config, SeverityMode, SpcError};

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct CompareFlagSources {
    pub tolerance: bool,
    pub color_tolerance: bool,
    pub mode: bool,
}

impl CompareFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            tolerance: flag_present(args, "--tolerance"),
            color_tolerance: flag_present(args, "--color-tolerance"),
            mode: flag_present(args, "--mode"),
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchFlagSources {
    pub concurrency: bool,
    pub timeout: bool,
}

impl BatchFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            concurrency: flag_present(args, "--concurrency"),
            timeout: flag_present(args, "--timeout"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Merge compare flags into the config, preferring CLI when flags are present.
/// Ignored properties from both sources are combined.
pub fn resolve_compare_settings(
    cli_tolerance: f64,
    cli_color_tolerance: f64,
    cli_mode: SeverityMode,
    cli_ignore: Option<&[String]>,
    config: &Config,
    flags: &CompareFlagSources,
) -> Config {
    let base = &config.comparison;
    let mut ignore_properties = base.ignore_properties.clone();
    for property in cli_ignore.unwrap_or_default() {
        let property = property.trim();
        if !property.is_empty() && !ignore_properties.iter().any(|p| p == property) {
            ignore_properties.push(property.to_string());
        }
    }

    Config {
        comparison: ComparisonOptions {
            tolerance: if flags.tolerance {
                cli_tolerance
            } else {
                base.tolerance
            },
            color_tolerance: if flags.color_tolerance {
                cli_color_tolerance
            } else {
                base.color_tolerance
            },
            severity_mode: if flags.mode {
                cli_mode
            } else {
                base.severity_mode
            },
            ignore_properties,
        },
        ..config.clone()
    }
}

/// Merge batch flags into the config. A zero timeout disables it.
pub fn resolve_batch_settings(
    cli_concurrency: usize,
    cli_timeout_secs: u64,
    config: &Config,
    flags: &BatchFlagSources,
) -> Config {
    let mut resolved = config.clone();
    if flags.concurrency {
        resolved.batch.concurrency = cli_concurrency;
    }
    if flags.timeout {
        resolved.batch.timeout =
            (cli_timeout_secs > 0).then(|| Duration::from_secs(cli_timeout_secs));
    }
    resolved
}

/// Load config from a file, central config, or return defaults.
/// Priority: explicit path > ~/.config/spc/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, SpcError> {
    Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        SpcError::Config(format!("Failed to read config {}: {}", loc, e))
    })
}

/// Validate the config after CLI overrides have been applied.
pub fn validate_config(config: &Config, path: Option<&Path>) -> Result<(), SpcError> {
    config.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        SpcError::Config(prefix)
    })
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let c = &config.comparison;
    let ignored = if c.ignore_properties.is_empty() {
        "none".to_string()
    } else {
        c.ignore_properties.join(",")
    };
    let timeout = config
        .batch
        .timeout
        .map(|t| format!("{}s", t.as_secs()))
        .unwrap_or_else(|| "off".to_string());
    format!(
        "Effective config [{source}]: tolerance={:.2}, color-tolerance={:.2}, mode={}, ignore={}, root-font-size={}, aliases={}, class-aliases={}, opaque={}, batch: concurrency={}, timeout={}",
        c.tolerance,
        c.color_tolerance,
        c.severity_mode,
        ignored,
        config.units.root_font_size,
        config.aliases.design_to_impl.len(),
        config.aliases.class_to_design.len(),
        config.opaque_components.len(),
        config.batch.concurrency,
        timeout,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict_config() -> Config {
        let mut cfg = Config::default();
        cfg.comparison.tolerance = 3.0;
        cfg.comparison.color_tolerance = 20.0;
        cfg.comparison.severity_mode = SeverityMode::Strict;
        cfg.comparison.ignore_properties = vec!["gap".to_string()];
        cfg
    }

    #[test]
    fn resolve_compare_settings_prefers_config_when_flags_absent() {
        let cfg = strict_config();
        let resolved = resolve_compare_settings(
            1.0,
            10.0,
            SeverityMode::Normal,
            None,
            &cfg,
            &CompareFlagSources::default(),
        );

        assert_eq!(resolved.comparison.tolerance, 3.0);
        assert_eq!(resolved.comparison.color_tolerance, 20.0);
        assert_eq!(resolved.comparison.severity_mode, SeverityMode::Strict);
        assert_eq!(resolved.comparison.ignore_properties, vec!["gap"]);
    }

    #[test]
    fn resolve_compare_settings_prefers_cli_when_flags_present() {
        let cfg = strict_config();
        let flags = CompareFlagSources {
            tolerance: true,
            color_tolerance: true,
            mode: true,
        };
        let ignore = vec!["borderRadius".to_string(), "gap".to_string()];
        let resolved = resolve_compare_settings(
            0.5,
            4.0,
            SeverityMode::Lenient,
            Some(ignore.as_slice()),
            &cfg,
            &flags,
        );

        assert_eq!(resolved.comparison.tolerance, 0.5);
        assert_eq!(resolved.comparison.color_tolerance, 4.0);
        assert_eq!(resolved.comparison.severity_mode, SeverityMode::Lenient);
        assert_eq!(
            resolved.comparison.ignore_properties,
            vec!["gap", "borderRadius"]
        );
    }

    #[test]
    fn flag_sources_detect_equals_form() {
        let args: Vec<String> = ["spc", "compare", "--tolerance=2", "--mode", "strict"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let flags = CompareFlagSources::from_args(&args);
        assert!(flags.tolerance);
        assert!(flags.mode);
        assert!(!flags.color_tolerance);
    }

    #[test]
    fn zero_timeout_disables_batch_deadline() {
        let flags = BatchFlagSources {
            concurrency: true,
            timeout: true,
        };
        let resolved = resolve_batch_settings(2, 0, &Config::default(), &flags);
        assert_eq!(resolved.batch.concurrency, 2);
        assert!(resolved.batch.timeout.is_none());

        let untouched = resolve_batch_settings(9, 9, &Config::default(), &BatchFlagSources::default());
        assert_eq!(untouched.batch.concurrency, 4);
        assert_eq!(untouched.batch.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn negative_tolerance_from_cli_is_rejected() {
        let flags = CompareFlagSources {
            tolerance: true,
            ..CompareFlagSources::default()
        };
        let resolved =
            resolve_compare_settings(-1.0, 10.0, SeverityMode::Normal, None, &Config::default(), &flags);
        let err = validate_config(&resolved, None).unwrap_err();
        assert!(err.to_string().contains("tolerance"));
    }

    #[test]
    fn format_effective_config_includes_all_fields() {
        let summary = format_effective_config(&strict_config(), Some(Path::new("spc.toml")));
        assert!(summary.contains("tolerance=3.00"));
        assert!(summary.contains("color-tolerance=20.00"));
        assert!(summary.contains("mode=strict"));
        assert!(summary.contains("ignore=gap"));
        assert!(summary.contains("concurrency=4"));
        assert!(summary.contains("timeout=30s"));
        assert!(summary.contains("spc.toml"));
    }
}
