//! Command implementations.

mod info;
mod run;
mod send;
mod validate;

pub use info::run_info;
pub use run::run_dispatch;
pub use send::run_send;
pub use validate::run_validate;

use anyhow::{Context, Result};
use std::path::Path;

use crate::error::CliError;

/// Load and validate the configuration file
pub(crate) fn load_config(path: &Path) -> Result<contracts::PushConfig> {
    if !path.exists() {
        return Err(CliError::config_not_found(path).into());
    }

    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
