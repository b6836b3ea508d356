//! Bridge configuration — compiler location and flags loaded from ~/.faust-cmaj/config.yaml.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Configuration loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Faust executable.
    #[serde(default = "default_faust_path")]
    pub faust_path: PathBuf,
    /// Directories passed to the compiler as `-I <dir>`.
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,
    /// Extra compiler flags inserted before the mandatory ones.
    #[serde(default)]
    pub extra_args: String,
    /// Log the generated input declarations after each compile.
    #[serde(default = "default_log_declarations")]
    pub log_declarations: bool,
}

fn default_faust_path() -> PathBuf {
    PathBuf::from("faust")
}

fn default_log_declarations() -> bool {
    true
}

/// Standard config location.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".faust-cmaj").join("config.yaml"))
}

impl BridgeConfig {
    /// Load config from the standard path (~/.faust-cmaj/config.yaml).
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load() -> Option<Self> {
        Self::load_optional(&default_config_path()?)
    }

    /// Load config from `path`, or None if it is missing or unreadable.
    pub fn load_optional(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        serde_yaml::from_str(&content).ok()
    }

    /// Load config from an explicit path. Unlike [`BridgeConfig::load`] a
    /// missing or invalid file is an error.
    pub fn load_from(path: &Path) -> Result<Self, BridgeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BridgeError::Config(format!("{}: {e}", path.display())))?;
        serde_yaml::from_str(&content)
            .map_err(|e| BridgeError::Config(format!("{}: {e}", path.display())))
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            faust_path: default_faust_path(),
            include_dirs: Vec::new(),
            extra_args: String::new(),
            log_declarations: default_log_declarations(),
        }
    }
}
