use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Markup parse error: {reason}")]
    MarkupParse { reason: String },

    #[error("Grammar error: {0}")]
    Grammar(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl SpcError {
    pub fn markup_parse(reason: impl Into<String>) -> Self {
        SpcError::MarkupParse {
            reason: reason.into(),
        }
    }

    /// True when the error means "comparison skipped for this unit" rather
    /// than a fault in the run itself.
    pub fn is_skip(&self) -> bool {
        matches!(self, SpcError::MarkupParse { .. })
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            SpcError::Io(e) => ErrorPayload::new(
                ErrorCategory::Io,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            SpcError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Parse,
                e.to_string(),
                "Check that the design export is valid JSON with id/type/name fields.",
            ),
            SpcError::Yaml(e) => ErrorPayload::new(
                ErrorCategory::Parse,
                e.to_string(),
                "Check YAML indentation and field names in the design export or manifest.",
            ),
            SpcError::Toml(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check the TOML config syntax; see [comparison], [aliases] and [batch] sections.",
            ),
            SpcError::MarkupParse { reason } => ErrorPayload::new(
                ErrorCategory::Parse,
                reason.to_string(),
                "The markup could not be parsed as TSX; fix syntax errors before comparing.",
            ),
            SpcError::Grammar(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "The TSX grammar failed to load; rebuild with matching tree-sitter versions.",
            ),
            SpcError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("tolerance") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Tolerances must be zero or positive (e.g., --tolerance 1 --color-tolerance 10).",
                    )
                } else if lower.contains("concurrency") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use a batch concurrency of at least 1 (--concurrency or [batch].concurrency).",
                    )
                } else if lower.contains("severity mode") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use one of: strict, normal, lenient.",
                    )
                } else if lower.contains("file not found") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Verify the file exists; manifest paths are resolved relative to the manifest.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths and the config file sections.",
                    )
                }
            }
            SpcError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, SpcError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Parse,
    Io,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
