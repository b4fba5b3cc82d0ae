use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Location of the project config, relative to the project root.
pub const PROJECT_CONFIG_PATH: &str = ".tracbacks/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracbackConfig {
    #[serde(default)]
    pub excerpt: ExcerptConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcerptConfig {
    /// Characters of context quoted on each side of a reference.
    #[serde(default = "default_context_chars")]
    pub context_chars: usize,
    /// Windows ending this close to either edge of the comment are treated
    /// as reaching it.
    #[serde(default = "default_weed_buffer")]
    pub weed_buffer: usize,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            context_chars: default_context_chars(),
            weed_buffer: default_weed_buffer(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// When false, every listener hook is a no-op.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

/// Load `.tracbacks/config.toml` under `project_root`, or defaults if absent.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<TracbackConfig, ConfigError> {
    let path = project_root.join(PROJECT_CONFIG_PATH);
    if !path.exists() {
        return Ok(TracbackConfig::default());
    }
    load_config_file(&path)
}

/// Load an explicit config file. Unlike [`load_project_config`], a missing
/// file is an error.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load_config_file(path: &Path) -> Result<TracbackConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: PathBuf::from(path),
        source,
    })?;

    toml::from_str::<TracbackConfig>(&content).map_err(|source| ConfigError::Parse {
        path: PathBuf::from(path),
        source,
    })
}

const fn default_true() -> bool {
    true
}

const fn default_context_chars() -> usize {
    80
}

const fn default_weed_buffer() -> usize {
    2
}
