//! Render configuration, read from an optional JSON file.
//!
//! ```json
//! { "char_spacing": 1, "line_spacing": 2, "background": [0, 0, 0, 255], "padding": 4 }
//! ```
//!
//! Every field is optional. Command-line flags override file values.

use std::path::{Path, PathBuf};

use cellfont_text::{Color, Spacing};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Atlas image; the embedded font is used when absent.
    pub font: Option<PathBuf>,
    #[serde(flatten)]
    pub spacing: Spacing,
    pub background: Color,
    /// Blank border around the text, in pixels.
    pub padding: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font: None,
            spacing: Spacing::default(),
            background: Color::BLACK,
            padding: 0,
        }
    }
}

impl RenderConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
