use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::naming::NameResolver;
use crate::primitives::DEFAULT_ROOT_FONT_SIZE;
use crate::{Result, SpcError};

/// How property differences are graded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityMode {
    Strict,
    #[default]
    Normal,
    Lenient,
}

impl fmt::Display for SeverityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeverityMode::Strict => "strict",
            SeverityMode::Normal => "normal",
            SeverityMode::Lenient => "lenient",
        })
    }
}

impl FromStr for SeverityMode {
    type Err = SpcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(SeverityMode::Strict),
            "normal" => Ok(SeverityMode::Normal),
            "lenient" => Ok(SeverityMode::Lenient),
            _ => Err(SpcError::Config(format!("Unknown severity mode: {}", s))),
        }
    }
}

/// Caller-supplied knobs for one comparison run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ComparisonOptions {
    pub tolerance: f64,
    pub color_tolerance: f64,
    pub severity_mode: SeverityMode,
    pub ignore_properties: Vec<String>,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            tolerance: 1.0,
            color_tolerance: 10.0,
            severity_mode: SeverityMode::Normal,
            ignore_properties: Vec::new(),
        }
    }
}

impl ComparisonOptions {
    pub fn is_ignored(&self, property: &str) -> bool {
        self.ignore_properties.iter().any(|p| p == property)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    pub root_font_size: f64,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            root_font_size: DEFAULT_ROOT_FONT_SIZE,
        }
    }
}

/// Name tables: design name → implementation name, and implementation
/// class → design name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasConfig {
    pub design_to_impl: BTreeMap<String, String>,
    pub class_to_design: BTreeMap<String, String>,
}

/// A design node whose stroke is known to render invisibly over a given
/// background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeOverride {
    pub node_name: String,
    /// Matched as a substring of the computed background color.
    pub background: String,
    pub stroke: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub concurrency: usize,
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub comparison: ComparisonOptions,
    pub units: UnitConfig,
    pub aliases: AliasConfig,
    /// Design name → implementation component name. Subtrees with these
    /// names are compared by identity only.
    pub opaque_components: BTreeMap<String, String>,
    pub stroke_overrides: Vec<StrokeOverride>,
    pub batch: BatchConfig,
}

impl Config {
    /// Load configuration. Priority: explicit path > central config > defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::central_config_path() {
                Some(central) if central.exists() => Self::from_file(&central),
                _ => Ok(Config::default()),
            },
        }
    }

    /// `~/.config/spc/config.toml`, when a home directory is known.
    pub fn central_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(|home| PathBuf::from(home).join(".config").join("spc").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(SpcError::Config(format!(
                "File not found: {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);
        if is_yaml {
            Self::from_yaml_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Config> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Config> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.comparison.tolerance >= 0.0) {
            return Err(SpcError::Config(
                "tolerance must not be negative".to_string(),
            ));
        }
        if !(self.comparison.color_tolerance >= 0.0) {
            return Err(SpcError::Config(
                "color tolerance must not be negative".to_string(),
            ));
        }
        if !(self.units.root_font_size > 0.0) {
            return Err(SpcError::Config(
                "units.root_font_size must be greater than zero".to_string(),
            ));
        }
        if self.batch.concurrency == 0 {
            return Err(SpcError::Config(
                "batch concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn name_resolver(&self) -> NameResolver {
        NameResolver::new(
            self.aliases.design_to_impl.clone(),
            self.aliases.class_to_design.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_values_match_expected() {
        let cfg = Config::default();

        assert!((cfg.comparison.tolerance - 1.0).abs() < f64::EPSILON);
        assert!((cfg.comparison.color_tolerance - 10.0).abs() < f64::EPSILON);
        assert_eq!(cfg.comparison.severity_mode, SeverityMode::Normal);
        assert!(cfg.comparison.ignore_properties.is_empty());
        assert!((cfg.units.root_font_size - 16.0).abs() < f64::EPSILON);
        assert_eq!(cfg.batch.concurrency, 4);
        assert_eq!(cfg.batch.timeout, Some(Duration::from_secs(30)));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn toml_sections_override_defaults() {
        let cfg = Config::from_toml_str(
            r##"
[comparison]
color_tolerance = 20.0
severity_mode = "strict"
ignore_properties = ["width", "height"]

[aliases.design_to_impl]
primaryCta = "submitButton"

[aliases.class_to_design]
container = "LoginScreen"

[opaque_components]
AvatarBadge = "Avatar"

[[stroke_overrides]]
node_name = "settingsButton"
background = "rgba(0, 188, 212"
stroke = "#00BCD4"

[batch]
concurrency = 2
timeout = "1m 30s"
"##,
        )
        .expect("config parses");

        assert!((cfg.comparison.tolerance - 1.0).abs() < f64::EPSILON);
        assert!((cfg.comparison.color_tolerance - 20.0).abs() < f64::EPSILON);
        assert_eq!(cfg.comparison.severity_mode, SeverityMode::Strict);
        assert!(cfg.comparison.is_ignored("height"));
        assert_eq!(cfg.opaque_components.get("AvatarBadge").map(String::as_str), Some("Avatar"));
        assert_eq!(cfg.stroke_overrides.len(), 1);
        assert_eq!(cfg.batch.concurrency, 2);
        assert_eq!(cfg.batch.timeout, Some(Duration::from_secs(90)));

        let resolver = cfg.name_resolver();
        assert_eq!(resolver.forward_alias("primaryCta"), Some("submitButton"));
        assert_eq!(resolver.design_name_for_class("container"), Some("LoginScreen"));
    }

    #[test]
    fn yaml_files_are_detected_by_extension() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("spc.yaml");
        std::fs::write(
            &path,
            "comparison:\n  tolerance: 2.5\n  severity_mode: lenient\nunits:\n  root_font_size: 10\n",
        )
        .expect("write config");

        let cfg = Config::load(Some(&path)).expect("yaml config loads");
        assert!((cfg.comparison.tolerance - 2.5).abs() < f64::EPSILON);
        assert_eq!(cfg.comparison.severity_mode, SeverityMode::Lenient);
        assert!((cfg.units.root_font_size - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_explicit_file_is_a_config_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, SpcError::Config(ref msg) if msg.contains("File not found")));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.comparison.color_tolerance = -1.0;
        assert!(cfg.validate().unwrap_err().to_string().contains("color tolerance"));

        let mut cfg = Config::default();
        cfg.batch.concurrency = 0;
        assert!(cfg.validate().unwrap_err().to_string().contains("concurrency"));

        let mut cfg = Config::default();
        cfg.units.root_font_size = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn severity_mode_parses_case_insensitively() {
        assert_eq!("STRICT".parse::<SeverityMode>().unwrap(), SeverityMode::Strict);
        assert!("loud".parse::<SeverityMode>().is_err());
    }
}
