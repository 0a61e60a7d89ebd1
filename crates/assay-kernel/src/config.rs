//! Checker configuration.
//!
//! ```toml
//! [diagnostics]
//! max_rejections = 32      # omit to keep every reason
//! max_value_width = 120
//! suggest_phrases = true
//! ```
//!
//! Missing keys take their defaults; unknown keys are rejected.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckerConfig {
    pub diagnostics: DiagnosticsConfig,
}

/// Limits on how much an unknown-call failure reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Rejection reasons embedded in an unknown-call failure. `None`
    /// keeps one per definition.
    pub max_rejections: Option<usize>,

    /// Characters of a rendered value kept in messages.
    pub max_value_width: usize,

    /// List known phrases of the same arity in unknown-call messages.
    pub suggest_phrases: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            max_rejections: None,
            max_value_width: 120,
            suggest_phrases: true,
        }
    }
}

impl CheckerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, "<inline>")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    fn parse(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::ParseToml {
            origin: origin.to_string(),
            source,
        })
    }
}
