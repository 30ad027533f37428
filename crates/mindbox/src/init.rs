//! # Startup
//!
//! [`initialize`] turns "where is my data" into a ready [`MindBoxApi`].
//!
//! ## Data Directory Resolution
//!
//! 1. `data_override` (the CLI's `--data-dir`), used as is.
//! 2. `data_dir` from [`MindBoxConfig`] (file or `MINDBOX_DATA_DIR`).
//! 3. The OS data directory from `directories::ProjectDirs`.
//!
//! The directory does not have to exist yet; [`FsBackend`] creates it on the
//! first write, so read-only commands on a fresh machine leave no trace.

use crate::api::MindBoxApi;
use crate::config::{project_dirs, MindBoxConfig};
use crate::error::{MindBoxError, Result};
use crate::store::entity_store::EntityStore;
use crate::store::fs_backend::FsBackend;
use std::path::PathBuf;
use tracing::debug;

pub struct MindBoxContext {
    pub api: MindBoxApi<FsBackend>,
    pub config: MindBoxConfig,
    pub data_dir: PathBuf,
    /// The config file that was consulted (it may not exist).
    pub config_file: Option<PathBuf>,
}

pub fn resolve_data_dir(data_override: Option<PathBuf>, config: &MindBoxConfig) -> Result<PathBuf> {
    data_override
        .or_else(|| config.data_dir.clone())
        .or_else(|| project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
        .ok_or_else(|| MindBoxError::Config("could not determine a data directory".to_string()))
}

/// Loads config, opens the file-backed store and wires up the API.
pub fn initialize(data_override: Option<PathBuf>) -> Result<MindBoxContext> {
    let config_file = MindBoxConfig::default_file();
    let config = MindBoxConfig::load(config_file.as_deref())?;
    let data_dir = resolve_data_dir(data_override, &config)?;

    debug!(data_dir = %data_dir.display(), policy = ?config.keyword_policy(), "initializing");

    let store = EntityStore::open(FsBackend::new(data_dir.clone()))?
        .with_keyword_policy(config.keyword_policy());

    Ok(MindBoxContext {
        api: MindBoxApi::new(store),
        config,
        data_dir,
        config_file,
    })
}
