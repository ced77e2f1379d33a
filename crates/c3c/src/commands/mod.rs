//! Command implementations

pub mod check;
pub mod install;
pub mod version;

use anyhow::{Context, Result};
use c3c_core::HierarchicalConfigLoader;
use c3c_update::Updater;
use camino::Utf8Path;
use tracing::debug;

/// Load layered configuration and build an updater for `root`
pub(crate) async fn load_updater(root: &Utf8Path) -> Result<Updater> {
    let loader = HierarchicalConfigLoader::new().context("Failed to locate configuration")?;
    let config = loader
        .load_updater_config()
        .context("Failed to load updater configuration")?;
    debug!("Loaded configuration from {}", loader.config_dir());

    let install_root = root
        .canonicalize_utf8()
        .with_context(|| format!("Installation root not found: {}", root))?;

    Updater::from_config(&config, install_root.as_std_path())
        .await
        .with_context(|| format!("Failed to open installation at {}", install_root))
}
