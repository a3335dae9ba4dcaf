use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Header names commonly used by Outlook exports for the sent timestamp.
/// Matched case-insensitively when no date column is supplied explicitly.
pub const DATE_COLUMN_CANDIDATES: &[&str] = &[
    "Sent",
    "Enviado",
    "Fecha",
    "Date",
    "Fecha de envío",
    "Sent On",
    "Date Sent",
    "Enviados el",
    "Fecha de envío:",
];

/// Header names checked, in order, for the message subject.
pub const SUBJECT_COLUMN_CANDIDATES: &[&str] = &["Subject", "Asunto"];

/// Parameters for one pipeline invocation. Validated/defaulted by the
/// caller; the core only consumes them.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Lookback window in months for the "Cliente reciente" label
    pub lookback_months: u32,
    /// Column holding the sent timestamp; None means every contact is a follow-up
    pub date_column: Option<String>,
    /// Whether the Pais column is emitted in the output tables
    pub emit_country: bool,
    /// Exclusion rule configuration
    pub exclusion: ExclusionConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookback_months: 6,
            date_column: None,
            emit_country: true,
            exclusion: ExclusionConfig::default(),
        }
    }
}

/// Configuration for the exclusion filter.
#[derive(Debug, Clone)]
pub struct ExclusionConfig {
    /// Apply the built-in role-account prefix list
    pub use_role_list: bool,
    /// User-supplied patterns, literal prefixes or regexes depending on `use_regex`
    pub custom_patterns: Vec<String>,
    /// Treat custom patterns as regexes instead of literal prefixes
    pub use_regex: bool,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            use_role_list: true,
            custom_patterns: Vec::new(),
            use_regex: false,
        }
    }
}

/// On-disk exclusion rules, loadable from a TOML file.
#[derive(Debug, Deserialize)]
pub struct RulesFile {
    /// Custom exclusion patterns applied to local-parts
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Interpret `patterns` as regexes
    #[serde(default)]
    pub use_regex: bool,
    /// Disable the built-in role-account list
    #[serde(default)]
    pub disable_role_list: bool,
}

impl RulesFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read rules file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let rules: RulesFile = toml::from_str(&content)?;
        Ok(rules)
    }
}

/// Finds the first candidate date column present in the input headers,
/// case-insensitively.
pub fn detect_date_column(headers: &[String]) -> Option<String> {
    for candidate in DATE_COLUMN_CANDIDATES {
        if let Some(h) = headers
            .iter()
            .find(|h| h.eq_ignore_ascii_case(candidate))
        {
            return Some(h.clone());
        }
    }
    None
}
