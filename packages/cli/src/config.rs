use anyhow::{Context, Result};
use blockpress_editor::EditorOptions;
use blockpress_model::Status;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "blockpress.config.json";

/// Blockpress configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// History settings for edit sessions
    pub editor: EditorOptions,

    /// Status given to documents created with `new`
    pub default_status: Status,

    /// Pretty-print written payloads
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: EditorOptions::default(),
            default_status: Status::Draft,
            pretty: true,
        }
    }
}

impl Config {
    /// Load config from a directory, falling back to defaults
    pub fn load(cwd: &Path) -> Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load an explicit config file, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Cannot read config {}", path.display()))?;
        let config = serde_json::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Resolve `--config` against the working directory
    pub fn resolve(cwd: &Path, explicit: Option<&PathBuf>) -> Result<Self> {
        match explicit {
            Some(path) if path.is_absolute() => Self::load_from(path),
            Some(path) => Self::load_from(&cwd.join(path)),
            None => Self::load(cwd),
        }
    }

    /// Serialize a value the way this config asks for
    pub fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}
