// Path: crates/cli/src/util.rs

use anyhow::{anyhow, Context, Result};
use dagsel_storage::FsBlockStore;
use dagsel_types::config::CliConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable naming the block store directory.
pub const STORE_ENV: &str = "DAGSEL_STORE";

/// Loads the configuration file if one was given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    match path {
        Some(path) => {
            let config = CliConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            log::debug!("loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(CliConfig::default()),
    }
}

/// Picks the store directory: the flag (or its environment variable, which
/// clap folds into the flag), then the config file.
pub fn store_path(flag: Option<PathBuf>, config: &CliConfig) -> Result<PathBuf> {
    flag.or_else(|| config.store_path.clone())
        .ok_or_else(|| anyhow!("`{STORE_ENV}` needs to be defined"))
}

/// Opens the filesystem block store the command should use.
pub async fn open_store(flag: Option<PathBuf>, config: &CliConfig) -> Result<Arc<FsBlockStore>> {
    let path = store_path(flag, config)?;
    let store = FsBlockStore::open(&path)
        .await
        .with_context(|| format!("Failed to open block store {}", path.display()))?;
    Ok(Arc::new(store))
}
