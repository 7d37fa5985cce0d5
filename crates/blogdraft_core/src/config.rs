//! Editor runtime configuration.
//!
//! # Responsibility
//! - Provide defaults for storage key, debounce delay, media retention and
//!   assembly formatting.
//! - Parse and validate JSON overrides at one boundary.
//!
//! # Invariants
//! - A constructed `EditorConfig` has passed `validate()`.

use crate::editor::assembler::AssembleOptions;
use crate::editor::debounce::DEFAULT_DEBOUNCE_MS;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default local storage entry name for the editor snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "blog-editor-state";
/// Default media blob retention window.
pub const DEFAULT_MEDIA_RETENTION_DAYS: u32 = 30;

const MAX_DEBOUNCE_MS: u64 = 10_000;
const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Errors from config parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// JSON payload could not be parsed.
    Parse(String),
    /// A field holds an out-of-range value.
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid editor config: {message}"),
            Self::Invalid { field, message } => {
                write!(f, "invalid editor config field `{field}`: {message}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Editor runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Local key-value entry holding the serialized editor snapshot.
    pub storage_key: String,
    /// Quiet period before rich-text edits reach the store.
    pub debounce_ms: u64,
    /// Media blobs older than this are swept.
    pub media_retention_days: u32,
    /// Emit `## <section>` headings in the assembled document. Off by default.
    pub include_section_headings: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            media_retention_days: DEFAULT_MEDIA_RETENTION_DAYS,
            include_section_headings: false,
        }
    }
}

impl EditorConfig {
    /// Parses JSON overrides on top of defaults and validates the result.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "storage_key",
                message: "must not be blank".to_string(),
            });
        }
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::Invalid {
                field: "debounce_ms",
                message: format!("must be <= {MAX_DEBOUNCE_MS}, got {}", self.debounce_ms),
            });
        }
        if self.media_retention_days == 0 {
            return Err(ConfigError::Invalid {
                field: "media_retention_days",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn assemble_options(&self) -> AssembleOptions {
        AssembleOptions {
            include_section_headings: self.include_section_headings,
        }
    }

    /// Retention window in milliseconds.
    pub fn media_retention_ms(&self) -> i64 {
        i64::from(self.media_retention_days) * MS_PER_DAY
    }
}
