//! # Configuration
//!
//! MindBox configuration is a [`confique`] struct loaded in layers.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `MINDBOX_DATA_DIR`, `MINDBOX_PRUNE_EMPTY_KEYWORDS`.
//! 2. **Config file**: `$MINDBOX_CONFIG` if set, else `mindbox.toml` in the OS
//!    config directory (via `directories`). A missing file is fine.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! A `--data-dir` given on the command line beats all of these; that override
//! is applied in [`crate::init`].
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir | Where `boxes.json`, `thoughts.json`, `keywords.json` live |
//! | `prune_empty_keywords` | `false` | Delete a keyword when its last thought goes away |

use crate::error::{MindBoxError, Result};
use crate::relations::KeywordPolicy;
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "mindbox.toml";
pub const CONFIG_PATH_ENV: &str = "MINDBOX_CONFIG";

/// Configuration for mindbox, stored in `mindbox.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MindBoxConfig {
    /// Directory holding the three JSON tables.
    /// When absent, the OS data directory is used.
    #[config(env = "MINDBOX_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Delete keywords whose thought list becomes empty.
    #[config(env = "MINDBOX_PRUNE_EMPTY_KEYWORDS", default = false)]
    pub prune_empty_keywords: bool,
}

impl Default for MindBoxConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            prune_empty_keywords: false,
        }
    }
}

impl MindBoxConfig {
    /// Environment, then `file` (if it exists), then defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| MindBoxError::Config(e.to_string()))
    }

    /// Reads one file with no environment layer.
    pub fn load_file(path: &Path) -> Result<Self> {
        Self::builder()
            .file(path)
            .load()
            .map_err(|e| MindBoxError::Config(e.to_string()))
    }

    /// `$MINDBOX_CONFIG`, or `mindbox.toml` in the OS config directory.
    pub fn default_file() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn keyword_policy(&self) -> KeywordPolicy {
        if self.prune_empty_keywords {
            KeywordPolicy::PruneEmpty
        } else {
            KeywordPolicy::Keep
        }
    }
}

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "mindbox", "mindbox")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MindBoxConfig::default();
        assert_eq!(config.data_dir, None);
        assert_eq!(config.keyword_policy(), KeywordPolicy::Keep);
    }

    #[test]
    fn test_prune_flag_selects_policy() {
        let config = MindBoxConfig {
            prune_empty_keywords: true,
            ..Default::default()
        };
        assert_eq!(config.keyword_policy(), KeywordPolicy::PruneEmpty);
    }

    #[test]
    fn test_load_file_reads_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "data_dir = \"/tmp/minds\"\nprune_empty_keywords = true\n",
        )
        .unwrap();

        let config = MindBoxConfig::load_file(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/minds")));
        assert!(config.prune_empty_keywords);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MindBoxConfig::load_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, MindBoxConfig::default());
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "prune_empty_keywords = \"sometimes\"\n").unwrap();
        let err = MindBoxConfig::load_file(&path).unwrap_err();
        assert!(matches!(err, MindBoxError::Config(_)));
    }

    #[test]
    fn test_serializes_to_toml() {
        let config = MindBoxConfig {
            data_dir: Some(PathBuf::from("/data")),
            prune_empty_keywords: false,
        };
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("data_dir = \"/data\""));
        let back: MindBoxConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
