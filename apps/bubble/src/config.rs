//! # Configuration
//!
//! Settings layered as: built-in defaults, then an optional TOML file, then
//! command-line flags (applied by the CLI).
//!
//! ```toml
//! oriented = false
//! profiling = false
//! format = "gexf"
//! declarations = true
//! ```

use bubble_core::{BubbleError, ExportFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "bubble.toml";

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BubbleConfig {
    /// Keep edges directed.
    pub oriented: bool,
    /// Emit INFO diagnostics when validating.
    pub profiling: bool,
    /// Export format. Unset means: guess from the output file extension,
    /// then fall back to dot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,
    /// Write NODE/SET declarations in bubble exports.
    pub declarations: bool,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            oriented: false,
            profiling: false,
            format: None,
            declarations: true,
        }
    }
}

impl BubbleConfig {
    /// Parse a TOML document. Missing keys keep their default.
    pub fn from_toml(text: &str) -> Result<Self, BubbleError> {
        toml::from_str(text)
            .map_err(|e| BubbleError::SerializationError(format!("Invalid config: {}", e)))
    }

    /// Load the config layer.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read when present in the working directory, else defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, BubbleError> {
        let path = match path {
            Some(path) => path,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                default
            }
        };

        let metadata = std::fs::metadata(path).map_err(|e| {
            BubbleError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(BubbleError::SerializationError(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }
        let text = std::fs::read_to_string(path).map_err(|e| {
            BubbleError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;

        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }
}
