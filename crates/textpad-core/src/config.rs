//! Editor configuration.
//!
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```json
//! { "line_numbers": false }
//! ```

use crate::session::DEFAULT_MAX_PATTERN_LEN;
use crate::undo::DEFAULT_UNDO_LIMIT;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading an [`EditorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// The config text is not valid JSON for [`EditorConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Startup settings of the editor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Show the line-number gutter.
    pub line_numbers: bool,
    /// Soft-wrap long lines at the pane width.
    pub word_wrap: bool,
    /// Upper bound, in characters, of stored search and replacement texts.
    pub max_pattern_len: usize,
    /// Edits kept for undo; older ones are forgotten.
    pub undo_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            line_numbers: true,
            word_wrap: true,
            max_pattern_len: DEFAULT_MAX_PATTERN_LEN,
            undo_limit: DEFAULT_UNDO_LIMIT,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }
}
