#![forbid(unsafe_code)]

//! Configuration for [`CommandHistory`](crate::CommandHistory).
//!
//! # Loading
//!
//! ```toml
//! # rewind.toml
//! limit = 250
//! clear_redo_on_record = true
//! ```
//!
//! ```rust,ignore
//! let config = HistoryConfig::from_toml_file("rewind.toml")?;
//! let config = HistoryConfig::from_json_str(r#"{ "limit": 50 }"#)?;
//! ```
//!
//! File loading requires the `config-file` feature. Every loader validates
//! the result, so a zero limit never reaches a history.
//!
//! # Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `REWIND_HISTORY_LIMIT` | usize | 100 | Undo capacity |
//! | `REWIND_CLEAR_REDO_ON_RECORD` | bool | false | Drop redo history on record |
//! | `REWIND_TRIM_ON_SHRINK` | bool | false | Evict immediately when the limit drops |

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;

/// Default undo capacity.
pub const DEFAULT_LIMIT: usize = 100;

/// Configuration for the command history.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct HistoryConfig {
    /// Maximum number of entries kept in the undo sequence.
    pub limit: usize,

    /// Discard the redo sequence whenever a new command is recorded.
    ///
    /// Off by default: recording only appends to the undo sequence and
    /// previously undone commands stay redoable.
    pub clear_redo_on_record: bool,

    /// Evict surplus undo entries as soon as the limit is lowered.
    ///
    /// Off by default: a lowered limit is enforced on the next record.
    pub trim_on_shrink: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            clear_redo_on_record: false,
            trim_on_shrink: false,
        }
    }
}

impl HistoryConfig {
    /// Create a configuration with the given undo capacity.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Set whether recording clears the redo sequence.
    #[must_use]
    pub fn with_clear_redo_on_record(mut self, clear: bool) -> Self {
        self.clear_redo_on_record = clear;
        self
    }

    /// Set whether lowering the limit trims immediately.
    #[must_use]
    pub fn with_trim_on_shrink(mut self, trim: bool) -> Self {
        self.trim_on_shrink = trim;
        self
    }

    /// Create unlimited configuration (for testing).
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), HistoryError> {
        validate_limit(self.limit)
    }

    /// Load config from environment variables.
    ///
    /// Unparseable values are ignored and the default is kept. The result is
    /// not validated; `REWIND_HISTORY_LIMIT=0` surfaces as
    /// [`HistoryError::InvalidLimit`] when the history is built.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = var("REWIND_HISTORY_LIMIT")
            && let Ok(limit) = val.trim().parse::<usize>()
        {
            config.limit = limit;
        }

        if let Some(val) = var("REWIND_CLEAR_REDO_ON_RECORD") {
            config.clear_redo_on_record = parse_flag(&val);
        }

        if let Some(val) = var("REWIND_TRIM_ON_SHRINK") {
            config.trim_on_shrink = parse_flag(&val);
        }

        config
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config-file")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSer)
    }
}

pub(crate) fn validate_limit(limit: usize) -> Result<(), HistoryError> {
    if limit == 0 {
        return Err(HistoryError::InvalidLimit { requested: limit });
    }
    Ok(())
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

/// Errors from loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "config-file")]
    TomlSer(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "config-file")]
    Json(serde_json::Error),
    /// Parsed but rejected by validation.
    Invalid(HistoryError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-file")]
            Self::TomlSer(e) => write!(f, "TOML serialize error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Invalid(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::TomlSer(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Json(e) => Some(e),
            Self::Invalid(e) => Some(e),
        }
    }
}
